//! RSS feed handler, served at `/rss`, `/rss.xml`, `/feed` and `/feed.xml`.

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::api::dto::{ApiError, FeedQuery};
use crate::api::servers::app_state::AppState;
use crate::api::servers::extractors::base_url;
use crate::modules::feed::{FeedService, clamp_limit};

/// GET /rss
pub async fn rss(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<FeedQuery>,
) -> Response {
    let limit = clamp_limit(query.limit.as_deref());
    let base = base_url(&headers);

    match FeedService::new(&state.blog.db).build(&base, limit).await {
        Ok(xml) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/rss+xml; charset=utf-8"),
                (header::CACHE_CONTROL, "public, max-age=3600"),
            ],
            xml,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "RSS generation failed");
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate RSS feed")
                .into_response()
        }
    }
}
