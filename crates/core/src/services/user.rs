//! User service.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use reels_common::{AppError, AppResult, IdGenerator};
use reels_db::{entities::user, repositories::UserRepository};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

/// Input for creating a new user.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserInput {
    #[validate(length(min = 1, max = 64))]
    pub username: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    #[validate(length(max = 256))]
    pub name: Option<String>,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub fn new(user_repo: UserRepository) -> Self {
        Self {
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a new account.
    pub async fn create(&self, input: CreateUserInput) -> AppResult<user::Model> {
        input.validate()?;

        // Check if username is taken (case-insensitively)
        if self
            .user_repo
            .find_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(AppError::InvalidArgument(
                "Username already taken".to_string(),
            ));
        }

        let password_hash = hash_password(&input.password)?;

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            username: Set(input.username.clone()),
            username_lower: Set(input.username.to_lowercase()),
            name: Set(input.name),
            password_hash: Set(password_hash),
            ..Default::default()
        };

        self.user_repo.create(model).await
    }

    /// Get a user by ID.
    pub async fn get(&self, id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }

    /// Authenticate a user by username and password.
    ///
    /// Unknown usernames and wrong passwords are indistinguishable to
    /// the caller.
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<user::Model> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::Unauthenticated("invalid credentials".to_string()))?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::Unauthenticated("invalid credentials".to_string()));
        }

        Ok(user)
    }

    /// Resolve a verified token subject to its stored identity.
    ///
    /// The token payload is never trusted as the identity: a subject
    /// whose account no longer exists fails authentication even though
    /// the token itself verified.
    pub async fn resolve_token_subject(&self, user_id: &str) -> AppResult<user::Model> {
        match self.user_repo.find_by_id(user_id).await? {
            Some(user) => Ok(user),
            None => Err(AppError::Unauthenticated("user not found".to_string())),
        }
    }
}

/// Hash a password for storage.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use std::sync::Arc;

    fn create_test_user(id: &str, username: &str, password: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: username.to_string(),
            username_lower: username.to_lowercase(),
            name: None,
            password_hash: hash_password(password).unwrap(),
            avatar_url: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_service(db: DatabaseConnection) -> UserService {
        UserService::new(UserRepository::new(Arc::new(db)))
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();

        let service = create_test_service(db);

        let result = service.get("nonexistent").await;
        match result {
            Err(AppError::UserNotFound(id)) => assert_eq!(id, "nonexistent"),
            _ => panic!("Expected UserNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_resolve_token_subject_found() {
        let user = create_test_user("user1", "testuser", "password123");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user.clone()]])
            .into_connection();

        let service = create_test_service(db);

        let resolved = service.resolve_token_subject("user1").await.unwrap();
        assert_eq!(resolved.id, "user1");
    }

    #[tokio::test]
    async fn test_resolve_token_subject_deleted_account() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();

        let service = create_test_service(db);

        let result = service.resolve_token_subject("gone").await;
        match result {
            Err(AppError::Unauthenticated(msg)) => assert_eq!(msg, "user not found"),
            _ => panic!("Expected Unauthenticated error"),
        }
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password() {
        let user = create_test_user("user1", "testuser", "password123");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user]])
            .into_connection();

        let service = create_test_service(db);

        let result = service.authenticate("testuser", "wrong-password").await;
        assert!(matches!(result, Err(AppError::Unauthenticated(_))));
    }

    #[tokio::test]
    async fn test_authenticate_ok() {
        let user = create_test_user("user1", "testuser", "password123");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user]])
            .into_connection();

        let service = create_test_service(db);

        let authenticated = service.authenticate("testuser", "password123").await.unwrap();
        assert_eq!(authenticated.id, "user1");
    }

    #[tokio::test]
    async fn test_create_user_input_validation() {
        // Username too long
        let input = CreateUserInput {
            username: "a".repeat(200),
            password: "password123".to_string(),
            name: None,
        };
        assert!(input.validate().is_err());

        // Password too short
        let input = CreateUserInput {
            username: "testuser".to_string(),
            password: "short".to_string(),
            name: None,
        };
        assert!(input.validate().is_err());

        // Valid input
        let input = CreateUserInput {
            username: "testuser".to_string(),
            password: "password123".to_string(),
            name: Some("Test User".to_string()),
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("password123").unwrap();
        assert!(verify_password("password123", &hash).unwrap());
        assert!(!verify_password("other-password", &hash).unwrap());
    }
}
