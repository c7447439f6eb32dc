//! API endpoints.

mod auth;
mod comments;
mod reels;

use axum::{Router, middleware as axum_middleware};

use crate::middleware::{AppState, auth_middleware};

/// Create the API router.
///
/// Every `/reels` route sits behind the auth middleware; the account
/// routes do not.
pub fn router(state: &AppState) -> Router<AppState> {
    Router::new().nest("/auth", auth::router()).nest(
        "/reels",
        reels::router()
            .merge(comments::router())
            .route_layer(axum_middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
    )
}
