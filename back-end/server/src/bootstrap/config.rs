//! Process configuration loaded from environment variables.
//!
//! Runtime site settings (blog name, footer links, ...) are not part of this;
//! they live in the `configs` table and are served by `SettingsService`.

use std::path::PathBuf;
use std::time::Duration;

use errors::AppError;

use crate::modules::auth::jwt::MAX_EXPIRY_HOURS;
use crate::utils::env::{
    env_bool, env_duration_secs, env_list, env_path, env_string, env_string_opt, env_u16, env_u32,
    env_u64,
};

#[derive(Debug, Clone)]
pub struct Config {
    pub db: DbConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub cors: CorsConfig,
    pub uploads: UploadConfig,
    pub admin: AdminSeedConfig,
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
    pub logging_enabled: bool,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Operator supplied signing key. When absent the key is read from (or
    /// generated into) the `jwt_secret` setting.
    pub secret: Option<String>,
    pub expiry_hours: u64,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub max_bytes: usize,
}

/// Credentials of the admin account created on first boot.
#[derive(Debug, Clone)]
pub struct AdminSeedConfig {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let config = Config {
            db: DbConfig {
                url: env_string("DATABASE_URL", "sqlite://./data/blog.db?mode=rwc"),
                max_connections: env_u32("DB_MAX_CONNECTIONS", 10),
                min_connections: env_u32("DB_MIN_CONNECTIONS", 1),
                connect_timeout: env_duration_secs("DB_CONNECT_TIMEOUT", 8),
                idle_timeout: env_duration_secs("DB_IDLE_TIMEOUT", 600),
                max_lifetime: env_duration_secs("DB_MAX_LIFETIME", 1800),
                logging_enabled: env_bool("DB_LOGGING", false),
            },
            server: ServerConfig {
                host: env_string("HOST", "0.0.0.0"),
                port: env_u16("PORT", 8080),
            },
            jwt: JwtConfig {
                secret: env_string_opt("JWT_SECRET"),
                expiry_hours: env_u64("JWT_EXPIRY_HOURS", 24 * 7),
            },
            cors: CorsConfig {
                allowed_origins: env_list(
                    "CORS_ALLOWED_ORIGINS",
                    &["http://localhost:3000", "http://localhost:5173"],
                ),
                allow_credentials: env_bool("CORS_ALLOW_CREDENTIALS", true),
            },
            uploads: UploadConfig {
                dir: env_path("UPLOAD_DIR", "./data/uploads"),
                max_bytes: env_u64("UPLOAD_MAX_BYTES", 32 * 1024 * 1024) as usize,
            },
            admin: AdminSeedConfig {
                username: env_string("ADMIN_USERNAME", "admin"),
                email: env_string("ADMIN_EMAIL", "admin@example.com"),
                password: env_string("ADMIN_PASSWORD", "admin123"),
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.jwt.expiry_hours == 0 {
            return Err(AppError::Config(
                "JWT_EXPIRY_HOURS must be greater than zero".to_string(),
            ));
        }
        if self.jwt.expiry_hours > MAX_EXPIRY_HOURS {
            return Err(AppError::Config(format!(
                "JWT_EXPIRY_HOURS must be at most {}",
                MAX_EXPIRY_HOURS
            )));
        }
        if self.db.min_connections > self.db.max_connections {
            return Err(AppError::Config(format!(
                "DB_MIN_CONNECTIONS ({}) exceeds DB_MAX_CONNECTIONS ({})",
                self.db.min_connections, self.db.max_connections
            )));
        }
        if self.admin.password.len() < 6 {
            return Err(AppError::Config(
                "ADMIN_PASSWORD must be at least 6 characters".to_string(),
            ));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
