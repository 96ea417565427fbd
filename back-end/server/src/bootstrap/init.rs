//! First-boot initialization: upload directory, default settings and the
//! seeded admin account. Every step is idempotent.

use errors::AppError;
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::bootstrap::config::Config;
use crate::modules::auth::AuthService;
use crate::modules::files::UploadStore;
use crate::modules::settings::SettingsService;

pub async fn initialize(
    db: &DatabaseConnection,
    config: &Config,
    uploads: &UploadStore,
) -> Result<(), AppError> {
    uploads.ensure_root().await?;
    info!(dir = %uploads.root().display(), "Upload directory ready");

    SettingsService::new(db)
        .initialize_defaults()
        .await
        .map_err(|e| AppError::Storage(Box::new(e)))?;

    let seeded = AuthService::new(db, &config.jwt)
        .seed_admin(&config.admin)
        .await
        .map_err(|e| AppError::Storage(Box::new(e)))?;
    if seeded.is_none() {
        info!("Users present, admin seeding skipped");
    }

    Ok(())
}
