//! Integration tests for file uploads and the `/uploads` static route.

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::json;

use super::helpers::*;
use crate::bootstrap::init::setup_test_server;

#[tokio::test]
async fn test_upload_stores_bytes_and_record() {
    let server = setup_test_server().await;
    let token = admin_token(&server.router).await;
    let post = create_published_post(&server.router, &token, "With attachment").await;
    let post_id = post["id"].to_string();

    let body = multipart_body(
        &[("post_id", &post_id), ("description", "Quarterly numbers")],
        Some(("report.PDF", "application/pdf", b"%PDF-1.4 fake")),
    );
    let (status, file) = upload_request(&server.router, &token, body).await;

    assert_eq!(status, StatusCode::CREATED, "upload failed: {file}");
    assert_eq!(file["original_file_name"], "report.PDF");
    assert_eq!(file["display_name"], "report.PDF");
    assert_eq!(file["description"], "Quarterly numbers");
    assert_eq!(file["mime_type"], "application/pdf");
    assert_eq!(file["file_size"], 13);
    let server_path = file["server_path"].as_str().unwrap();
    assert!(server_path.ends_with(".pdf"));
    assert!(server.config.uploads.dir.join(server_path).exists());

    let request = Request::builder()
        .uri(file["url"].as_str().unwrap())
        .body(Body::empty())
        .unwrap();
    let (status, _, content) = send(&server.router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content, "%PDF-1.4 fake");
}

#[tokio::test]
async fn test_upload_requires_existing_post() {
    let server = setup_test_server().await;
    let token = admin_token(&server.router).await;

    let body = multipart_body(&[("post_id", "777")], Some(("a.txt", "text/plain", b"hi")));
    let (status, _) = upload_request(&server.router, &token, body).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let body = multipart_body(&[], Some(("a.txt", "text/plain", b"hi")));
    let (status, body) = upload_request(&server.router, &token, body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "post_id is required");
}

#[tokio::test]
async fn test_upload_requires_file_part() {
    let server = setup_test_server().await;
    let token = admin_token(&server.router).await;
    let post = create_published_post(&server.router, &token, "Empty").await;

    let body = multipart_body(&[("post_id", &post["id"].to_string())], None);
    let (status, body) = upload_request(&server.router, &token, body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "File is required");
}

#[tokio::test]
async fn test_update_list_and_delete_file() {
    let server = setup_test_server().await;
    let token = admin_token(&server.router).await;
    let post = create_published_post(&server.router, &token, "Files").await;
    let post_id = post["id"].to_string();
    let body = multipart_body(
        &[("post_id", &post_id), ("display_name", "Notes")],
        Some(("notes.txt", "text/plain", b"remember")),
    );
    let (_, file) = upload_request(&server.router, &token, body).await;
    let path = format!("/api/files/{}", file["id"]);

    let (status, updated) = authed_request(
        &server.router,
        Method::PUT,
        &path,
        Some(&token),
        Some(json!({ "display_name": "Meeting notes", "description": "March" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["display_name"], "Meeting notes");
    assert_eq!(updated["description"], "March");

    let (status, listed) = authed_request(
        &server.router,
        Method::GET,
        &format!("/api/files?post_id={post_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["pagination"]["total"], 1);

    let on_disk = server
        .config
        .uploads
        .dir
        .join(file["server_path"].as_str().unwrap());
    assert!(on_disk.exists());

    let (status, _) =
        authed_request(&server.router, Method::DELETE, &path, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!on_disk.exists());

    let (status, _) = authed_request(&server.router, Method::GET, &path, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_file_routes_require_admin() {
    let server = setup_test_server().await;

    let (status, _) = get_request(&server.router, "/api/files").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
