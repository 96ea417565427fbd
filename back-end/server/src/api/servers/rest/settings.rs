//! Site settings and account handlers.

use axum::{extract::State, response::Json};
use tracing::info;

use crate::api::dto::{
    ApiError, ChangePasswordRequest, ConfigResponse, MessageResponse, UpdateConfigRequest,
    UpdateFooterLinksRequest,
};
use crate::api::servers::app_state::AppState;
use crate::api::servers::extractors::ValidatedJson;
use crate::api::servers::jwt_middleware::AdminUser;
use crate::modules::auth::AuthService;
use crate::modules::settings::SettingsService;

/// GET /api/config
pub async fn get_config(State(state): State<AppState>) -> Result<Json<ConfigResponse>, ApiError> {
    let settings = SettingsService::new(&state.blog.db);
    let configs = settings.all().await?;
    let footer_links = settings.footer_links().await?;

    Ok(Json(ConfigResponse {
        configs,
        footer_links,
    }))
}

/// PUT /api/settings/config
pub async fn update_config(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<UpdateConfigRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    SettingsService::new(&state.blog.db)
        .update_site_settings(&request.configs)
        .await?;

    info!(admin_id = admin.id, keys = request.configs.len(), "Site settings updated");
    Ok(Json(MessageResponse::new("Configurations updated successfully")))
}

/// PUT /api/settings/footer-links
pub async fn update_footer_links(
    _admin: AdminUser,
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<UpdateFooterLinksRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    SettingsService::new(&state.blog.db)
        .set_footer_links(&request.footer_links)
        .await?;
    Ok(Json(MessageResponse::new("Footer links updated successfully")))
}

/// PUT /api/settings/password
pub async fn update_password(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let blog = &state.blog;
    AuthService::new(&blog.db, &blog.jwt)
        .change_password(&admin, &request.current_password, &request.new_password)
        .await?;
    Ok(Json(MessageResponse::new("Password updated successfully")))
}
