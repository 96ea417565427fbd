//! Admin login.

use axum::{extract::State, response::Json};

use crate::api::dto::{ApiError, LoginRequest, LoginResponse};
use crate::api::servers::app_state::AppState;
use crate::api::servers::extractors::ValidatedJson;
use crate::modules::auth::AuthService;

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let blog = &state.blog;
    let result = AuthService::new(&blog.db, &blog.jwt)
        .login(&request.username, &request.password)
        .await?;

    Ok(Json(LoginResponse {
        token: result.token,
        user: result.user.into(),
    }))
}
