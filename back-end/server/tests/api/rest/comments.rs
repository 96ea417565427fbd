//! Integration tests for comment submission and moderation.

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};

use super::helpers::*;
use crate::bootstrap::init::setup_test_server;

async fn submit(router: &axum::Router, post_id: &Value, name: &str) -> (StatusCode, Value) {
    json_request(
        router,
        Method::POST,
        "/api/comments",
        json!({ "post_id": post_id, "name": name, "content": format!("{name} says hi") }),
    )
    .await
}

async fn set_status(router: &axum::Router, token: &str, id: &Value, status: &str) -> StatusCode {
    authed_request(
        router,
        Method::PUT,
        &format!("/api/admin/comments/{id}/status"),
        Some(token),
        Some(json!({ "status": status })),
    )
    .await
    .0
}

#[tokio::test]
async fn test_comment_on_published_post_is_pending() {
    let server = setup_test_server().await;
    let token = admin_token(&server.router).await;
    let post = create_published_post(&server.router, &token, "Open").await;

    let (status, body) = submit(&server.router, &post["id"], "ann").await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["comment"]["status"], "pending");
    assert!(body["message"].is_string());
    assert!(body["comment"].get("ip_address").is_none());
}

#[tokio::test]
async fn test_comment_on_unpublished_post_is_not_found() {
    let server = setup_test_server().await;
    let token = admin_token(&server.router).await;
    let draft = create_post(&server.router, &token, json!({ "title": "Draft", "content": "c" })).await;

    let (status, _) = submit(&server.router, &draft["id"], "ann").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = submit(&server.router, &json!(9999), "ann").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_submitter_details_are_recorded() {
    let server = setup_test_server().await;
    let token = admin_token(&server.router).await;
    let post = create_published_post(&server.router, &token, "Tracked").await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/comments")
        .header(header::CONTENT_TYPE, "application/json")
        .header("X-Forwarded-For", "203.0.113.9, 10.0.0.1")
        .header(header::REFERER, "https://example.org/somewhere")
        .body(Body::from(
            json!({ "post_id": post["id"], "name": "bo", "email": "", "content": "hello" })
                .to_string(),
        ))
        .unwrap();
    let (status, _, _) = send(&server.router, request).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, list) = authed_request(
        &server.router,
        Method::GET,
        "/api/admin/comments",
        Some(&token),
        None,
    )
    .await;
    let comment = &list["comments"][0];
    assert_eq!(comment["ip_address"], "203.0.113.9");
    assert_eq!(comment["referer"], "https://example.org/somewhere");
    assert_eq!(comment["email"], Value::Null);
    assert_eq!(comment["post"]["title"], "Tracked");
}

#[tokio::test]
async fn test_only_approved_comments_are_public() {
    let server = setup_test_server().await;
    let token = admin_token(&server.router).await;
    let post = create_published_post(&server.router, &token, "Moderated").await;
    let (_, first) = submit(&server.router, &post["id"], "first").await;
    let (_, second) = submit(&server.router, &post["id"], "second").await;
    submit(&server.router, &post["id"], "third").await;

    assert_eq!(set_status(&server.router, &token, &first["comment"]["id"], "approved").await, StatusCode::OK);
    assert_eq!(set_status(&server.router, &token, &second["comment"]["id"], "hidden").await, StatusCode::OK);

    let (status, public) =
        get_request(&server.router, &format!("/api/posts/{}/comments", post["id"])).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = public["comments"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["first"]);
}

#[tokio::test]
async fn test_invalid_status_is_rejected() {
    let server = setup_test_server().await;
    let token = admin_token(&server.router).await;
    let post = create_published_post(&server.router, &token, "Strict").await;
    let (_, created) = submit(&server.router, &post["id"], "ann").await;

    let status = set_status(&server.router, &token, &created["comment"]["id"], "archived").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let status = set_status(&server.router, &token, &json!(4242), "approved").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_status_filter_and_stats() {
    let server = setup_test_server().await;
    let token = admin_token(&server.router).await;
    let post = create_published_post(&server.router, &token, "Busy").await;
    let mut ids = Vec::new();
    for name in ["a", "b", "c", "d"] {
        let (_, body) = submit(&server.router, &post["id"], name).await;
        ids.push(body["comment"]["id"].clone());
    }
    set_status(&server.router, &token, &ids[0], "approved").await;
    set_status(&server.router, &token, &ids[1], "approved").await;
    set_status(&server.router, &token, &ids[2], "hidden").await;

    let (status, approved) = authed_request(
        &server.router,
        Method::GET,
        "/api/admin/comments?status=approved",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["pagination"]["total"], 2);
    assert!(
        approved["comments"]
            .as_array()
            .unwrap()
            .iter()
            .all(|c| c["status"] == "approved")
    );

    let (status, _) = authed_request(
        &server.router,
        Method::GET,
        "/api/admin/comments?status=archived",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, all) = authed_request(
        &server.router,
        Method::GET,
        "/api/admin/comments?status=all",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(all["pagination"]["total"], 4);

    let (status, stats) = authed_request(
        &server.router,
        Method::GET,
        "/api/admin/comments/stats",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        stats["stats"],
        json!({ "pending": 1, "approved": 2, "hidden": 1, "total": 4 })
    );
}

#[tokio::test]
async fn test_delete_comment() {
    let server = setup_test_server().await;
    let token = admin_token(&server.router).await;
    let post = create_published_post(&server.router, &token, "Cleanup").await;
    let (_, created) = submit(&server.router, &post["id"], "spam").await;
    let path = format!("/api/admin/comments/{}", created["comment"]["id"]);

    let (status, detail) =
        authed_request(&server.router, Method::GET, &path, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["comment"]["name"], "spam");

    let (status, _) =
        authed_request(&server.router, Method::DELETE, &path, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) =
        authed_request(&server.router, Method::GET, &path, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleted_post_keeps_comments_for_moderation() {
    let server = setup_test_server().await;
    let token = admin_token(&server.router).await;
    let post = create_published_post(&server.router, &token, "Gone soon").await;
    let (_, created) = submit(&server.router, &post["id"], "witness").await;
    set_status(&server.router, &token, &created["comment"]["id"], "approved").await;

    authed_request(
        &server.router,
        Method::DELETE,
        &format!("/api/posts/{}", post["id"]),
        Some(&token),
        None,
    )
    .await;

    let (status, _) =
        get_request(&server.router, &format!("/api/posts/{}/comments", post["id"])).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = submit(&server.router, &post["id"], "late").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, detail) = authed_request(
        &server.router,
        Method::GET,
        &format!("/api/admin/comments/{}", created["comment"]["id"]),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["comment"]["post"], Value::Null);
    assert_eq!(detail["comment"]["post_id"], post["id"]);
}
