//! Account endpoints.

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use reels_common::AppResult;
use reels_core::user::CreateUserInput;
use serde::{Deserialize, Serialize};

use crate::middleware::AppState;

/// Signup request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    pub name: Option<String>,
}

/// Signup response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub id: String,
    pub username: String,
    pub token: String,
}

/// Create a new account.
async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<SignupResponse>)> {
    let input = CreateUserInput {
        username: req.username,
        password: req.password,
        name: req.name,
    };

    let user = state.user_service.create(input).await?;
    let token = state.tokens.issue(&user.id)?;
    tracing::debug!(user_id = %user.id, "Account created");

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            id: user.id,
            username: user.username,
            token,
        }),
    ))
}

/// Signin request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigninRequest {
    pub username: String,
    pub password: String,
}

/// Signin response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SigninResponse {
    pub id: String,
    pub username: String,
    pub token: String,
}

/// Sign in to an existing account.
async fn signin(
    State(state): State<AppState>,
    Json(req): Json<SigninRequest>,
) -> AppResult<Json<SigninResponse>> {
    let user = state
        .user_service
        .authenticate(&req.username, &req.password)
        .await?;
    let token = state.tokens.issue(&user.id)?;

    Ok(Json(SigninResponse {
        id: user.id,
        username: user.username,
        token,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
}
