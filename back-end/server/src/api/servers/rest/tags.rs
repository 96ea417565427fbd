//! Tag handlers. Reads are public, writes require an admin.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};

use super::parse_id;
use crate::api::dto::{
    ApiError, CreateTagRequest, ListQuery, MessageResponse, PostResponse, TagPostsResponse,
    TagResponse, TagWithCountResponse, UpdateTagRequest,
};
use crate::api::servers::app_state::AppState;
use crate::api::servers::extractors::ValidatedJson;
use crate::api::servers::jwt_middleware::AdminUser;
use crate::modules::tags::TagService;

const DEFAULT_PAGE_SIZE: u64 = 10;
const MAX_PAGE_SIZE: u64 = 100;

/// GET /api/tags
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<TagResponse>>, ApiError> {
    let tags = TagService::new(&state.blog.db).list().await?;
    Ok(Json(tags.into_iter().map(TagResponse::from).collect()))
}

/// GET /api/tags/with-counts
pub async fn list_with_counts(
    State(state): State<AppState>,
) -> Result<Json<Vec<TagWithCountResponse>>, ApiError> {
    let tags = TagService::new(&state.blog.db).list_with_counts().await?;
    Ok(Json(tags.into_iter().map(TagWithCountResponse::from).collect()))
}

/// GET /api/tags/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TagResponse>, ApiError> {
    let id = parse_id(&id, "tag")?;
    let tag = TagService::new(&state.blog.db).get(id).await?;
    Ok(Json(tag.into()))
}

/// GET /api/tags/{id}/posts
///
/// `published=false` includes drafts; anything else shows published posts only.
pub async fn posts(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<TagPostsResponse>, ApiError> {
    let id = parse_id(&id, "tag")?;
    let page = query.page_request(DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    let published_only = query.published_flag().unwrap_or(true);

    let (tag, posts, pagination) = TagService::new(&state.blog.db)
        .posts(id, page, published_only)
        .await?;

    Ok(Json(TagPostsResponse {
        tag: tag.into(),
        posts: posts.into_iter().map(PostResponse::from).collect(),
        pagination,
    }))
}

/// POST /api/tags
pub async fn create(
    _admin: AdminUser,
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateTagRequest>,
) -> Result<(StatusCode, Json<TagResponse>), ApiError> {
    let tag = TagService::new(&state.blog.db)
        .create(&request.name, request.color.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(tag.into())))
}

/// PUT /api/tags/{id}
pub async fn update(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateTagRequest>,
) -> Result<Json<TagResponse>, ApiError> {
    let id = parse_id(&id, "tag")?;
    let tag = TagService::new(&state.blog.db)
        .update(id, request.name.as_deref(), request.color.as_deref())
        .await?;
    Ok(Json(tag.into()))
}

/// DELETE /api/tags/{id}
pub async fn delete(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id, "tag")?;
    TagService::new(&state.blog.db).delete(id).await?;
    Ok(Json(MessageResponse::new("Tag deleted successfully")))
}
