//! File attachment handlers (admin only).

use axum::{
    extract::{Multipart, Path, Query, State, multipart::MultipartError},
    http::StatusCode,
    response::Json,
};
use tracing::info;

use super::parse_id;
use crate::api::dto::{
    ApiError, FileListResponse, FileResponse, ListQuery, MessageResponse, UpdateFileRequest,
};
use crate::api::servers::app_state::AppState;
use crate::api::servers::extractors::ValidatedJson;
use crate::api::servers::jwt_middleware::AdminUser;
use crate::modules::files::{FileService, FileUpdate, FileUpload};

const DEFAULT_PAGE_SIZE: u64 = 20;
const MAX_PAGE_SIZE: u64 = 100;

fn multipart_error(err: MultipartError) -> ApiError {
    ApiError::new(err.status(), err.body_text())
}

/// POST /api/files
///
/// Multipart fields: `post_id`, `file`, optional `display_name` and
/// `description`.
pub async fn upload(
    _admin: AdminUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<FileResponse>), ApiError> {
    let mut post_id: Option<String> = None;
    let mut file: Option<(String, Option<String>, Vec<u8>)> = None;
    let mut display_name: Option<String> = None;
    let mut description: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let content_type = field.content_type().map(|s| s.to_string());
                let bytes = field.bytes().await.map_err(multipart_error)?;
                file = Some((file_name, content_type, bytes.to_vec()));
            }
            "post_id" => post_id = Some(field.text().await.map_err(multipart_error)?),
            "display_name" => display_name = Some(field.text().await.map_err(multipart_error)?),
            "description" => description = Some(field.text().await.map_err(multipart_error)?),
            _ => {}
        }
    }

    let post_id = post_id
        .filter(|raw| !raw.trim().is_empty())
        .ok_or_else(|| ApiError::validation("post_id is required"))?;
    let post_id = post_id
        .trim()
        .parse::<i32>()
        .map_err(|_| ApiError::validation("Invalid post_id"))?;
    let (original_file_name, mime_type, bytes) =
        file.ok_or_else(|| ApiError::validation("File is required"))?;

    let blog = &state.blog;
    let model = FileService::new(&blog.db, &blog.uploads)
        .upload(FileUpload {
            post_id,
            original_file_name,
            display_name,
            description,
            mime_type,
            bytes,
        })
        .await?;

    info!(file_id = model.id, size = model.file_size, "Upload stored");
    Ok((StatusCode::CREATED, Json(model.into())))
}

/// GET /api/files
pub async fn list(
    _admin: AdminUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<FileListResponse>, ApiError> {
    let page = query.page_request(DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    let blog = &state.blog;
    let (files, pagination) = FileService::new(&blog.db, &blog.uploads)
        .list(page, query.post_filter())
        .await?;

    Ok(Json(FileListResponse {
        files: files.into_iter().map(FileResponse::from).collect(),
        pagination,
    }))
}

/// GET /api/files/{id}
pub async fn get(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FileResponse>, ApiError> {
    let id = parse_id(&id, "file")?;
    let blog = &state.blog;
    let file = FileService::new(&blog.db, &blog.uploads).get(id).await?;
    Ok(Json(file.into()))
}

/// PUT /api/files/{id}
pub async fn update(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateFileRequest>,
) -> Result<Json<FileResponse>, ApiError> {
    let id = parse_id(&id, "file")?;
    let blog = &state.blog;
    let file = FileService::new(&blog.db, &blog.uploads)
        .update(
            id,
            FileUpdate {
                display_name: request.display_name,
                description: request.description,
            },
        )
        .await?;
    Ok(Json(file.into()))
}

/// DELETE /api/files/{id}
pub async fn delete(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id, "file")?;
    let blog = &state.blog;
    FileService::new(&blog.db, &blog.uploads).delete(id).await?;
    Ok(Json(MessageResponse::new("File deleted successfully")))
}
