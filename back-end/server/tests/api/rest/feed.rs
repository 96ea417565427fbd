//! Integration tests for the RSS feed routes.

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use serde_json::json;

use super::helpers::*;
use crate::bootstrap::init::setup_test_server;

async fn fetch(router: &axum::Router, path: &str) -> (StatusCode, HeaderMap, String) {
    let request = Request::builder()
        .uri(path)
        .header(header::HOST, "blog.test")
        .header("X-Forwarded-Proto", "https")
        .body(Body::empty())
        .unwrap();
    send(router, request).await
}

fn item_count(xml: &str) -> usize {
    xml.matches("<item>").count()
}

#[tokio::test]
async fn test_feed_served_on_every_alias() {
    let server = setup_test_server().await;

    for path in ["/rss", "/rss.xml", "/feed", "/feed.xml"] {
        let (status, headers, xml) = fetch(&server.router, path).await;
        assert_eq!(status, StatusCode::OK, "{path}");
        assert_eq!(
            headers[header::CONTENT_TYPE],
            "application/rss+xml; charset=utf-8"
        );
        assert_eq!(headers[header::CACHE_CONTROL], "public, max-age=3600");
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<title>My Blog</title>"));
        assert!(xml.contains("<link>https://blog.test</link>"));
    }
}

#[tokio::test]
async fn test_feed_lists_published_posts_with_categories() {
    let server = setup_test_server().await;
    let token = admin_token(&server.router).await;
    let tag = create_tag(&server.router, &token, "news").await;
    create_post(
        &server.router,
        &token,
        json!({
            "title": "Fish & Chips",
            "content": "<p>Crispy</p>",
            "published": true,
            "tag_ids": [tag["id"]]
        }),
    )
    .await;
    create_post(
        &server.router,
        &token,
        json!({ "title": "Hidden draft", "content": "c" }),
    )
    .await;

    let (_, _, xml) = fetch(&server.router, "/rss").await;

    assert_eq!(item_count(&xml), 1);
    assert!(xml.contains("<link>https://blog.test/posts/fish-chips</link>"));
    assert!(xml.contains("<category>news</category>"));
    assert!(xml.contains("<description>Crispy</description>"));
    assert!(!xml.contains("Hidden draft"));
}

#[tokio::test]
async fn test_feed_limit_is_clamped() {
    let server = setup_test_server().await;
    let token = admin_token(&server.router).await;
    for i in 0..55 {
        create_published_post(&server.router, &token, &format!("Post number {i}")).await;
    }

    let (_, _, xml) = fetch(&server.router, "/rss?limit=9999").await;
    assert_eq!(item_count(&xml), 50);

    let (_, _, xml) = fetch(&server.router, "/rss?limit=0").await;
    assert_eq!(item_count(&xml), 20);

    let (_, _, xml) = fetch(&server.router, "/rss?limit=abc").await;
    assert_eq!(item_count(&xml), 20);

    let (_, _, xml) = fetch(&server.router, "/rss?limit=3").await;
    assert_eq!(item_count(&xml), 3);
}

#[tokio::test]
async fn test_feed_uses_site_settings() {
    let server = setup_test_server().await;
    let token = admin_token(&server.router).await;
    authed_request(
        &server.router,
        axum::http::Method::PUT,
        "/api/settings/config",
        Some(&token),
        Some(json!({ "configs": { "blog_name": "Notes & Bits", "language": "fr" } })),
    )
    .await;

    let (_, _, xml) = fetch(&server.router, "/feed").await;

    assert!(xml.contains("<title>Notes &amp; Bits</title>"));
    assert!(xml.contains("<language>fr</language>"));
}
