use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use entity::user;
use serde_json::json;
use tracing::error;

use crate::api::servers::app_state::AppState;
use crate::modules::auth::AuthService;
use crate::modules::error::ServiceError;

/// An authenticated administrator, reloaded from the store on every request.
#[derive(Debug, Clone)]
pub struct AdminUser(pub user::Model);

#[derive(Debug)]
pub enum AuthError {
    MissingAuthHeader,
    InvalidAuthHeaderFormat,
    InvalidToken(String),
    Unavailable,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingAuthHeader => {
                (StatusCode::UNAUTHORIZED, "Authorization header required".to_string())
            }
            AuthError::InvalidAuthHeaderFormat => {
                (StatusCode::UNAUTHORIZED, "Bearer token required".to_string())
            }
            AuthError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, msg),
            AuthError::Unavailable => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AuthError::MissingAuthHeader)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidAuthHeaderFormat)?;

        let blog = &state.blog;
        let user = AuthService::new(&blog.db, &blog.jwt)
            .authenticate(token.trim())
            .await
            .map_err(|e| match e {
                ServiceError::Unauthorized(msg) => AuthError::InvalidToken(msg),
                other => {
                    error!(error = %other, "Token verification failed");
                    AuthError::Unavailable
                }
            })?;

        Ok(AdminUser(user))
    }
}
