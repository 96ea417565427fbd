//! Health check handler.

use axum::response::Json;
use serde_json::{Value, json};

/// GET /health
pub async fn check() -> Json<Value> {
    Json(json!({"status": "ok"}))
}
