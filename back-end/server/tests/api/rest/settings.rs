//! Integration tests for site settings and password changes.

use axum::http::{Method, StatusCode};
use serde_json::json;

use super::helpers::*;
use crate::bootstrap::init::{ADMIN_PASSWORD, ADMIN_USERNAME, setup_test_server};

#[tokio::test]
async fn test_public_config_has_defaults_and_no_secret() {
    let server = setup_test_server().await;
    admin_token(&server.router).await;

    let (status, body) = get_request(&server.router, "/api/config").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["configs"]["blog_name"], "My Blog");
    assert_eq!(body["configs"]["language"], "en");
    assert!(body["configs"].get("jwt_secret").is_none());
    assert_eq!(body["footer_links"].as_array().unwrap().len(), 3);
    assert_eq!(body["footer_links"][0], json!({ "name": "Home", "url": "/" }));
}

#[tokio::test]
async fn test_update_whitelisted_settings() {
    let server = setup_test_server().await;
    let token = admin_token(&server.router).await;

    let (status, _) = authed_request(
        &server.router,
        Method::PUT,
        "/api/settings/config",
        Some(&token),
        Some(json!({ "configs": { "blog_name": "Field Notes", "language": "de" } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = get_request(&server.router, "/api/config").await;
    assert_eq!(body["configs"]["blog_name"], "Field Notes");
    assert_eq!(body["configs"]["language"], "de");
}

#[tokio::test]
async fn test_unknown_key_rejects_whole_batch() {
    let server = setup_test_server().await;
    let token = admin_token(&server.router).await;

    let (status, body) = authed_request(
        &server.router,
        Method::PUT,
        "/api/settings/config",
        Some(&token),
        Some(json!({ "configs": { "blog_name": "Changed", "jwt_secret": "mine" } })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid configuration key: jwt_secret");

    let (_, body) = get_request(&server.router, "/api/config").await;
    assert_eq!(body["configs"]["blog_name"], "My Blog");

    // The token signed before the rejected batch still works.
    let (status, _) = authed_request(
        &server.router,
        Method::GET,
        "/api/admin/posts",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_footer_links_round_trip() {
    let server = setup_test_server().await;
    let token = admin_token(&server.router).await;
    let links = json!([{ "name": "About", "url": "/about" }]);

    let (status, _) = authed_request(
        &server.router,
        Method::PUT,
        "/api/settings/footer-links",
        Some(&token),
        Some(json!({ "footer_links": links })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = get_request(&server.router, "/api/config").await;
    assert_eq!(body["footer_links"], links);
}

#[tokio::test]
async fn test_password_change_requires_current_password() {
    let server = setup_test_server().await;
    let token = admin_token(&server.router).await;

    let (status, body) = authed_request(
        &server.router,
        Method::PUT,
        "/api/settings/password",
        Some(&token),
        Some(json!({ "current_password": "wrong", "new_password": "brand-new" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Current password is incorrect");

    let (status, _) = authed_request(
        &server.router,
        Method::PUT,
        "/api/settings/password",
        Some(&token),
        Some(json!({ "current_password": ADMIN_PASSWORD, "new_password": "brand-new" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = login_as(&server.router, ADMIN_USERNAME, ADMIN_PASSWORD).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = login_as(&server.router, ADMIN_USERNAME, "brand-new").await;
    assert_eq!(status, StatusCode::OK);

    // Sessions issued before the change stay valid.
    let (status, _) = authed_request(
        &server.router,
        Method::GET,
        "/api/admin/posts",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_short_new_password_is_rejected() {
    let server = setup_test_server().await;
    let token = admin_token(&server.router).await;

    let (status, _) = authed_request(
        &server.router,
        Method::PUT,
        "/api/settings/password",
        Some(&token),
        Some(json!({ "current_password": ADMIN_PASSWORD, "new_password": "123" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
