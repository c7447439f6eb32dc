//! API middleware.

#![allow(missing_docs)]

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use reels_common::{AppError, AuthTokens};
use reels_core::{CommentService, ReelService, UserService};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub reel_service: ReelService,
    pub comment_service: CommentService,
    pub tokens: AuthTokens,
}

/// Authentication middleware.
///
/// Verifies the bearer token, then resolves its subject against the
/// store, so a token for a deleted account does not authenticate. The
/// resolved caller is stored in request extensions for the [`AuthUser`]
/// extractor.
///
/// [`AuthUser`]: crate::extractors::AuthUser
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthenticated("no token provided".to_string()))?;

    let claims = state.tokens.verify(token)?;
    let user = state.user_service.resolve_token_subject(&claims.sub).await?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
