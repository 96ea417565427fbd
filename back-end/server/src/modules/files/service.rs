//! File service layer: metadata rows plus the bytes in `UploadStore`.

use chrono::Utc;
use entity::{file, post};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use tracing::{info, warn};

use crate::modules::error::{ServiceError, ServiceResult};
use crate::modules::files::storage::UploadStore;
use crate::modules::pagination::{PageMeta, PageRequest};

pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone)]
pub struct FileUpload {
    pub post_id: i32,
    pub original_file_name: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct FileUpdate {
    pub display_name: Option<String>,
    pub description: Option<String>,
}

pub struct FileService<'a> {
    db: &'a DatabaseConnection,
    store: &'a UploadStore,
}

impl<'a> FileService<'a> {
    pub fn new(db: &'a DatabaseConnection, store: &'a UploadStore) -> Self {
        Self { db, store }
    }

    pub async fn upload(&self, upload: FileUpload) -> ServiceResult<file::Model> {
        let post_exists = post::Entity::find_by_id(upload.post_id)
            .filter(post::Column::DeletedAt.is_null())
            .count(self.db)
            .await?
            > 0;
        if !post_exists {
            return Err(ServiceError::not_found("Post"));
        }

        let original = upload.original_file_name.trim().to_string();
        if original.is_empty() {
            return Err(ServiceError::Validation("File name is required".to_string()));
        }
        let display_name = upload
            .display_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| original.clone());
        let mime_type = upload
            .mime_type
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());

        let stored = self.store.save(&original, &upload.bytes).await?;

        let now = Utc::now().fixed_offset();
        let inserted = file::ActiveModel {
            post_id: Set(upload.post_id),
            original_file_name: Set(original),
            display_name: Set(display_name),
            description: Set(upload.description.unwrap_or_default()),
            server_path: Set(stored.server_path.clone()),
            file_size: Set(stored.size),
            mime_type: Set(mime_type),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await;

        match inserted {
            Ok(model) => {
                info!(file_id = model.id, post_id = model.post_id, path = %model.server_path, "File uploaded");
                Ok(model)
            }
            Err(e) => {
                // Keep disk and table in step.
                self.store.remove(&stored.server_path).await;
                Err(ServiceError::from_write(e, "A file with this path already exists"))
            }
        }
    }

    pub async fn list(
        &self,
        page: PageRequest,
        post_id: Option<i32>,
    ) -> ServiceResult<(Vec<file::Model>, PageMeta)> {
        let mut query = file::Entity::find().filter(file::Column::DeletedAt.is_null());
        if let Some(post_id) = post_id {
            query = query.filter(file::Column::PostId.eq(post_id));
        }

        let total = query.clone().count(self.db).await?;
        let files = query
            .order_by_desc(file::Column::CreatedAt)
            .order_by_desc(file::Column::Id)
            .offset(page.offset())
            .limit(page.limit)
            .all(self.db)
            .await?;

        Ok((files, PageMeta::new(page, total)))
    }

    pub async fn get(&self, id: i32) -> ServiceResult<file::Model> {
        file::Entity::find_by_id(id)
            .filter(file::Column::DeletedAt.is_null())
            .one(self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("File"))
    }

    pub async fn update(&self, id: i32, update: FileUpdate) -> ServiceResult<file::Model> {
        let existing = self.get(id).await?;
        let mut active: file::ActiveModel = existing.into();

        if let Some(name) = update.display_name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(ServiceError::Validation(
                    "Display name cannot be empty".to_string(),
                ));
            }
            active.display_name = Set(name);
        }
        if let Some(description) = update.description {
            active.description = Set(description);
        }
        active.updated_at = Set(Utc::now().fixed_offset());

        Ok(active.update(self.db).await?)
    }

    /// Soft-delete the row, then remove the bytes on a best-effort basis.
    pub async fn delete(&self, id: i32) -> ServiceResult<()> {
        let existing = self.get(id).await?;
        let server_path = existing.server_path.clone();

        let mut active: file::ActiveModel = existing.into();
        let now = Utc::now().fixed_offset();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        active.update(self.db).await?;

        if !self.store.remove(&server_path).await {
            warn!(file_id = id, path = %server_path, "File record deleted but bytes remain on disk");
        }

        info!(file_id = id, "File deleted");
        Ok(())
    }
}
