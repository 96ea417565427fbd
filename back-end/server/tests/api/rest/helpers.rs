use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::bootstrap::init::{ADMIN_PASSWORD, ADMIN_USERNAME};

pub const MULTIPART_BOUNDARY: &str = "----blog-test-boundary";

/// Send a request and return status, headers and the raw body.
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, String) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, String::from_utf8_lossy(&bytes).to_string())
}

fn parse_json(body: &str) -> Value {
    if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(body).unwrap_or(Value::String(body.to_string()))
    }
}

pub async fn get_request(router: &Router, path: &str) -> (StatusCode, Value) {
    authed_request(router, Method::GET, path, None, None).await
}

pub async fn json_request(
    router: &Router,
    method: Method,
    path: &str,
    body: Value,
) -> (StatusCode, Value) {
    authed_request(router, method, path, None, Some(body)).await
}

/// Request with an optional bearer token and optional JSON body.
pub async fn authed_request(
    router: &Router,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let (status, _, body) = send(router, request).await;
    (status, parse_json(&body))
}

pub async fn login_as(router: &Router, username: &str, password: &str) -> (StatusCode, Value) {
    json_request(
        router,
        Method::POST,
        "/api/auth/login",
        json!({ "username": username, "password": password }),
    )
    .await
}

/// Log in as the seeded admin and return the bearer token.
pub async fn admin_token(router: &Router) -> String {
    let (status, body) = login_as(router, ADMIN_USERNAME, ADMIN_PASSWORD).await;
    assert_eq!(status, StatusCode::OK, "admin login failed: {body}");
    body["token"].as_str().unwrap().to_string()
}

pub async fn create_post(router: &Router, token: &str, body: Value) -> Value {
    let (status, post) =
        authed_request(router, Method::POST, "/api/posts", Some(token), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "post creation failed: {post}");
    post
}

pub async fn create_published_post(router: &Router, token: &str, title: &str) -> Value {
    create_post(
        router,
        token,
        json!({ "title": title, "content": format!("Body of {title}"), "published": true }),
    )
    .await
}

pub async fn create_tag(router: &Router, token: &str, name: &str) -> Value {
    let (status, tag) = authed_request(
        router,
        Method::POST,
        "/api/tags",
        Some(token),
        Some(json!({ "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "tag creation failed: {tag}");
    tag
}

/// Multipart body with text fields and at most one file part.
pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, content_type, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn upload_request(router: &Router, token: &str, body: Vec<u8>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/files")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    let (status, _, body) = send(router, request).await;
    (status, parse_json(&body))
}
