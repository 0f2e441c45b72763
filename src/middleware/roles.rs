use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;
use crate::handlers::AppState;

use super::auth::AuthUser;

/// Only callers holding the configured admin role may continue.
///
/// Must run after `jwt_auth_middleware`.
pub async fn require_admin_middleware(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let Some(user) = request.extensions().get::<AuthUser>() else {
        return ApiError::unauthorized("JWT authentication required").into_response();
    };

    if !user.has_role(&state.admin_role) {
        tracing::info!("User {} lacks role '{}' for {}", user.uid, state.admin_role, request.uri());
        return ApiError::forbidden(format!("Role '{}' required", state.admin_role)).into_response();
    }

    next.run(request).await
}
