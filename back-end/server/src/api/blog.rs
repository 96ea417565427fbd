//! Long-lived handles shared by every request.

use sea_orm::DatabaseConnection;

use crate::bootstrap::config::{Config, JwtConfig};
use crate::modules::files::UploadStore;

pub struct Blog {
    pub db: DatabaseConnection,
    pub jwt: JwtConfig,
    pub uploads: UploadStore,
}

impl Blog {
    pub fn new(db: DatabaseConnection, config: &Config) -> Self {
        Blog {
            db,
            jwt: config.jwt.clone(),
            uploads: UploadStore::new(config.uploads.dir.clone()),
        }
    }
}
