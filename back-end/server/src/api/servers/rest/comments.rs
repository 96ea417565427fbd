//! Comment submission and moderation handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};

use super::parse_id;
use crate::api::dto::{
    AdminCommentDetailResponse, AdminCommentListResponse, AdminCommentResponse, ApiError,
    CommentCreatedResponse, CommentListResponse, CommentResponse, CommentStatsResponse,
    CreateCommentRequest, ListQuery, MessageResponse, UpdateCommentStatusRequest,
};
use crate::api::servers::app_state::AppState;
use crate::api::servers::extractors::{ClientInfo, ValidatedJson};
use crate::api::servers::jwt_middleware::AdminUser;
use crate::modules::comments::{CommentService, NewComment, parse_status_filter};

const DEFAULT_PAGE_SIZE: u64 = 20;
const MAX_PAGE_SIZE: u64 = 100;

// ============================================================================
// Public
// ============================================================================

/// POST /api/comments
pub async fn create(
    State(state): State<AppState>,
    ClientInfo(client): ClientInfo,
    ValidatedJson(request): ValidatedJson<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentCreatedResponse>), ApiError> {
    let comment = CommentService::new(&state.blog.db)
        .create(
            NewComment {
                post_id: request.post_id,
                name: request.name,
                email: request.email,
                content: request.content,
            },
            client,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CommentCreatedResponse {
            message: "Comment submitted successfully and is awaiting moderation".to_string(),
            comment: comment.into(),
        }),
    ))
}

/// GET /api/posts/{id}/comments
pub async fn list_for_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CommentListResponse>, ApiError> {
    let post_id = parse_id(&id, "post")?;
    let comments = CommentService::new(&state.blog.db)
        .list_approved(post_id)
        .await?;

    Ok(Json(CommentListResponse {
        comments: comments.into_iter().map(CommentResponse::from).collect(),
    }))
}

// ============================================================================
// Admin
// ============================================================================

/// GET /api/admin/comments
pub async fn list_admin(
    _admin: AdminUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<AdminCommentListResponse>, ApiError> {
    let page = query.page_request(DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    let status = parse_status_filter(query.status.as_deref())?;

    let (comments, pagination) = CommentService::new(&state.blog.db)
        .list(page, status)
        .await?;

    Ok(Json(AdminCommentListResponse {
        comments: comments
            .into_iter()
            .map(AdminCommentResponse::from)
            .collect(),
        pagination,
    }))
}

/// GET /api/admin/comments/{id}
pub async fn get_admin(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AdminCommentDetailResponse>, ApiError> {
    let id = parse_id(&id, "comment")?;
    let comment = CommentService::new(&state.blog.db).get(id).await?;
    Ok(Json(AdminCommentDetailResponse {
        comment: comment.into(),
    }))
}

/// PUT /api/admin/comments/{id}/status
pub async fn update_status(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateCommentStatusRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id, "comment")?;
    CommentService::new(&state.blog.db)
        .update_status(id, &request.status)
        .await?;
    Ok(Json(MessageResponse::new("Comment status updated successfully")))
}

/// DELETE /api/admin/comments/{id}
pub async fn delete(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id, "comment")?;
    CommentService::new(&state.blog.db).delete(id).await?;
    Ok(Json(MessageResponse::new("Comment deleted successfully")))
}

/// GET /api/admin/comments/stats
pub async fn stats(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<Json<CommentStatsResponse>, ApiError> {
    let stats = CommentService::new(&state.blog.db).stats().await?;
    Ok(Json(CommentStatsResponse { stats }))
}
