//! Post handlers.
//!
//! Public reads only ever see published, non-deleted posts and bump the view
//! counter; the admin variants see drafts and leave the counter alone.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use tracing::info;

use super::parse_id;
use crate::api::dto::{
    ApiError, CreatePostRequest, ListQuery, MessageResponse, PostListResponse, PostResponse,
    UpdatePostRequest,
};
use crate::api::servers::app_state::AppState;
use crate::api::servers::extractors::ValidatedJson;
use crate::api::servers::jwt_middleware::AdminUser;
use crate::modules::posts::{CreatePost, PostService, UpdatePost};

const DEFAULT_PAGE_SIZE: u64 = 10;
const MAX_PAGE_SIZE: u64 = 100;

// ============================================================================
// Public
// ============================================================================

/// GET /api/posts
pub async fn list_public(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PostListResponse>, ApiError> {
    let page = query.page_request(DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    let (posts, pagination) = PostService::new(&state.blog.db)
        .list(page, Some(true))
        .await?;

    Ok(Json(PostListResponse::new(posts, pagination)))
}

/// GET /api/posts/{id_or_slug}
pub async fn get_public(
    State(state): State<AppState>,
    Path(id_or_slug): Path<String>,
) -> Result<Json<PostResponse>, ApiError> {
    let post = PostService::new(&state.blog.db)
        .get_published(&id_or_slug)
        .await?;

    Ok(Json(post.into()))
}

// ============================================================================
// Admin
// ============================================================================

/// GET /api/admin/posts
pub async fn list_admin(
    _admin: AdminUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PostListResponse>, ApiError> {
    let page = query.page_request(DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    let (posts, pagination) = PostService::new(&state.blog.db)
        .list(page, query.published_flag())
        .await?;

    Ok(Json(PostListResponse::new(posts, pagination)))
}

/// GET /api/admin/posts/{id}
pub async fn get_admin(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PostResponse>, ApiError> {
    let id = parse_id(&id, "post")?;
    let post = PostService::new(&state.blog.db).get(id).await?;
    Ok(Json(post.into()))
}

/// POST /api/posts
pub async fn create(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), ApiError> {
    let post = PostService::new(&state.blog.db)
        .create(CreatePost {
            title: request.title,
            content: request.content,
            summary: request.summary,
            slug: request.slug,
            published: request.published,
            tag_ids: request.tag_ids,
        })
        .await?;

    info!(post_id = post.post.id, admin_id = admin.id, "Post created via API");
    Ok((StatusCode::CREATED, Json(post.into())))
}

/// PUT /api/posts/{id}
pub async fn update(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdatePostRequest>,
) -> Result<Json<PostResponse>, ApiError> {
    let id = parse_id(&id, "post")?;
    let post = PostService::new(&state.blog.db)
        .update(
            id,
            UpdatePost {
                title: request.title,
                content: request.content,
                summary: request.summary,
                slug: request.slug,
                published: request.published,
                tag_ids: request.tag_ids,
            },
        )
        .await?;

    Ok(Json(post.into()))
}

/// DELETE /api/posts/{id}
pub async fn delete(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id, "post")?;
    PostService::new(&state.blog.db).soft_delete(id).await?;
    Ok(Json(MessageResponse::new("Post deleted successfully")))
}
