use serial_test::serial;
use server::bootstrap::config::Config;

use crate::bootstrap::init::{remove_envs, set_env};

const KEYS: &[&str] = &[
    "DATABASE_URL",
    "HOST",
    "PORT",
    "JWT_SECRET",
    "JWT_EXPIRY_HOURS",
    "CORS_ALLOWED_ORIGINS",
    "UPLOAD_DIR",
    "UPLOAD_MAX_BYTES",
    "ADMIN_USERNAME",
    "ADMIN_EMAIL",
    "ADMIN_PASSWORD",
    "DB_MIN_CONNECTIONS",
    "DB_MAX_CONNECTIONS",
];

#[test]
#[serial]
fn test_from_env_defaults() {
    remove_envs(KEYS);

    let config = Config::from_env().unwrap();

    assert_eq!(config.db.url, "sqlite://./data/blog.db?mode=rwc");
    assert_eq!(config.bind_addr(), "0.0.0.0:8080");
    assert!(config.jwt.secret.is_none());
    assert_eq!(config.jwt.expiry_hours, 24 * 7);
    assert_eq!(config.admin.username, "admin");
    assert_eq!(config.uploads.max_bytes, 32 * 1024 * 1024);
}

#[test]
#[serial]
fn test_from_env_overrides() {
    remove_envs(KEYS);
    set_env("HOST", "127.0.0.1");
    set_env("PORT", "9000");
    set_env("JWT_SECRET", "operator-secret");
    set_env("CORS_ALLOWED_ORIGINS", "https://a.test, https://b.test");
    set_env("UPLOAD_DIR", "/tmp/blog-uploads");

    let config = Config::from_env().unwrap();
    remove_envs(KEYS);

    assert_eq!(config.bind_addr(), "127.0.0.1:9000");
    assert_eq!(config.jwt.secret.as_deref(), Some("operator-secret"));
    assert_eq!(
        config.cors.allowed_origins,
        vec!["https://a.test".to_string(), "https://b.test".to_string()]
    );
    assert_eq!(config.uploads.dir.to_str(), Some("/tmp/blog-uploads"));
}

#[test]
#[serial]
fn test_blank_jwt_secret_is_unset() {
    remove_envs(KEYS);
    set_env("JWT_SECRET", "   ");

    let config = Config::from_env().unwrap();
    remove_envs(KEYS);

    assert!(config.jwt.secret.is_none());
}

#[test]
#[serial]
fn test_rejects_zero_expiry() {
    remove_envs(KEYS);
    set_env("JWT_EXPIRY_HOURS", "0");

    let result = Config::from_env();
    remove_envs(KEYS);

    assert!(result.is_err());
}

#[test]
#[serial]
fn test_rejects_unbounded_expiry() {
    remove_envs(KEYS);
    set_env("JWT_EXPIRY_HOURS", "18446744073709551615");

    let result = Config::from_env();
    remove_envs(KEYS);

    assert!(result.is_err());
}

#[test]
#[serial]
fn test_accepts_longest_expiry() {
    remove_envs(KEYS);
    set_env("JWT_EXPIRY_HOURS", "87600");

    let config = Config::from_env().unwrap();
    remove_envs(KEYS);

    assert_eq!(config.jwt.expiry_hours, 87600);
}

#[test]
#[serial]
fn test_rejects_inverted_pool_bounds() {
    remove_envs(KEYS);
    set_env("DB_MIN_CONNECTIONS", "20");
    set_env("DB_MAX_CONNECTIONS", "5");

    let result = Config::from_env();
    remove_envs(KEYS);

    assert!(result.is_err());
}

#[test]
#[serial]
fn test_rejects_short_admin_password() {
    remove_envs(KEYS);
    set_env("ADMIN_PASSWORD", "abc");

    let result = Config::from_env();
    remove_envs(KEYS);

    assert!(result.is_err());
}
