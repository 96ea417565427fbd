use std::time::Duration;

use axum::Router;
use chrono::Utc;
use entity::user;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use server::api::blog::Blog;
use server::api::servers::app_state::AppState;
use server::api::servers::rest;
use server::bootstrap::config::{
    AdminSeedConfig, Config, CorsConfig, DbConfig, JwtConfig, ServerConfig, UploadConfig,
};
use server::bootstrap::init::initialize;
use server::modules::auth::password::hash_password;
use tempfile::TempDir;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin123";

/// Test server container with access to all components
pub struct TestServer {
    pub router: Router,
    pub db: DatabaseConnection,
    pub config: Config,
    pub temp: TempDir,
}

pub fn set_env(key: &str, value: &str) {
    unsafe {
        std::env::set_var(key, value);
    }
}

pub fn remove_env(key: &str) {
    unsafe {
        std::env::remove_var(key);
    }
}

/// Remove multiple environment variables
pub fn remove_envs(keys: &[&str]) {
    for key in keys {
        remove_env(key);
    }
}

pub fn create_test_config(temp: &TempDir) -> Config {
    Config {
        db: DbConfig {
            url: format!("sqlite://{}?mode=rwc", temp.path().join("test.db").display()),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(8),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(1800),
            logging_enabled: false,
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
        },
        jwt: JwtConfig {
            // Exercise the persisted signing secret.
            secret: None,
            expiry_hours: 1,
        },
        cors: CorsConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
            allow_credentials: true,
        },
        uploads: UploadConfig {
            dir: temp.path().join("uploads"),
            max_bytes: 1024 * 1024,
        },
        admin: AdminSeedConfig {
            username: ADMIN_USERNAME.to_string(),
            email: ADMIN_EMAIL.to_string(),
            password: ADMIN_PASSWORD.to_string(),
        },
    }
}

/// Setup just a test database - useful for testing services directly
pub async fn setup_test_db() -> (DatabaseConnection, TempDir) {
    let temp_dir = TempDir::new().unwrap();

    let db_path = temp_dir.path().join("test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let db = Database::connect(&db_url).await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    (db, temp_dir)
}

/// Setup a test server with a migrated database, default settings and the
/// seeded admin.
pub async fn setup_test_server() -> TestServer {
    let (db, temp) = setup_test_db().await;
    let config = create_test_config(&temp);

    let blog = Blog::new(db.clone(), &config);
    initialize(&blog.db, &config, &blog.uploads).await.unwrap();

    let router = rest::build_router(AppState::new(blog), &config);

    TestServer {
        router,
        db,
        config,
        temp,
    }
}

pub async fn create_user(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
    is_admin: bool,
) -> user::Model {
    let now = Utc::now().fixed_offset();
    user::ActiveModel {
        username: Set(username.to_string()),
        email: Set(format!("{}@example.com", username)),
        password_hash: Set(hash_password(password).unwrap()),
        is_admin: Set(is_admin),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}
