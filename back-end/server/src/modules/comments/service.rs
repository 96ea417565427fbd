//! Comment service layer.
//!
//! Public submissions always land as `pending`; readers only ever see
//! `approved` comments. When a post is soft-deleted its comments stay in
//! the table: public access to them answers 404 while moderation views
//! still list them with no post attached.

use std::str::FromStr;

use chrono::Utc;
use entity::comment::{self, CommentStatus};
use entity::post;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::Serialize;
use tracing::info;

use crate::modules::error::{ServiceError, ServiceResult};
use crate::modules::pagination::{PageMeta, PageRequest};
use crate::modules::posts::PostService;

/// Request-derived details about the submitter.
#[derive(Debug, Clone, Default)]
pub struct ClientMeta {
    pub ip_address: String,
    pub referer: String,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: i32,
    pub name: String,
    pub email: Option<String>,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct CommentWithPost {
    pub comment: comment::Model,
    /// `None` when the post has been soft-deleted
    pub post: Option<post::Model>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct CommentStats {
    pub pending: u64,
    pub approved: u64,
    pub hidden: u64,
    pub total: u64,
}

/// Parse an admin status filter. Empty and `all` mean no filter.
pub fn parse_status_filter(raw: Option<&str>) -> ServiceResult<Option<CommentStatus>> {
    match raw.map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some(s) => CommentStatus::from_str(s)
            .map(Some)
            .map_err(ServiceError::Validation),
    }
}

pub struct CommentService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CommentService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, new: NewComment, client: ClientMeta) -> ServiceResult<comment::Model> {
        PostService::new(self.db).find_published(new.post_id).await?;

        let name = new.name.trim().to_string();
        let content = new.content.trim().to_string();
        if name.is_empty() || content.is_empty() {
            return Err(ServiceError::Validation(
                "Name and content are required".to_string(),
            ));
        }
        let email = new
            .email
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());

        let now = Utc::now().fixed_offset();
        let model = comment::ActiveModel {
            post_id: Set(new.post_id),
            name: Set(name),
            email: Set(email),
            content: Set(content),
            status: Set(CommentStatus::Pending),
            ip_address: Set(client.ip_address),
            referer: Set(client.referer),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        info!(comment_id = model.id, post_id = model.post_id, "Comment submitted for moderation");
        Ok(model)
    }

    /// Approved comments of a published post, oldest first.
    pub async fn list_approved(&self, post_id: i32) -> ServiceResult<Vec<comment::Model>> {
        PostService::new(self.db).find_published(post_id).await?;

        Ok(comment::Entity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .filter(comment::Column::Status.eq(CommentStatus::Approved))
            .filter(comment::Column::DeletedAt.is_null())
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .all(self.db)
            .await?)
    }

    /// Moderation listing, newest first.
    pub async fn list(
        &self,
        page: PageRequest,
        status: Option<CommentStatus>,
    ) -> ServiceResult<(Vec<CommentWithPost>, PageMeta)> {
        let mut query = comment::Entity::find().filter(comment::Column::DeletedAt.is_null());
        if let Some(status) = status {
            query = query.filter(comment::Column::Status.eq(status));
        }

        let total = query.clone().count(self.db).await?;
        let rows = query
            .find_also_related(post::Entity)
            .order_by_desc(comment::Column::CreatedAt)
            .order_by_desc(comment::Column::Id)
            .offset(page.offset())
            .limit(page.limit)
            .all(self.db)
            .await?;

        let comments = rows
            .into_iter()
            .map(|(comment, post)| CommentWithPost {
                comment,
                post: post.filter(|p| p.deleted_at.is_none()),
            })
            .collect();

        Ok((comments, PageMeta::new(page, total)))
    }

    pub async fn get(&self, id: i32) -> ServiceResult<CommentWithPost> {
        let (comment, post) = comment::Entity::find_by_id(id)
            .filter(comment::Column::DeletedAt.is_null())
            .find_also_related(post::Entity)
            .one(self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Comment"))?;

        Ok(CommentWithPost {
            comment,
            post: post.filter(|p| p.deleted_at.is_none()),
        })
    }

    pub async fn update_status(&self, id: i32, status: &str) -> ServiceResult<comment::Model> {
        let status = CommentStatus::from_str(status.trim()).map_err(ServiceError::Validation)?;
        let existing = self.find_live(id).await?;

        let mut active: comment::ActiveModel = existing.into();
        active.status = Set(status);
        active.updated_at = Set(Utc::now().fixed_offset());
        let model = active.update(self.db).await?;

        info!(comment_id = id, status = %status, "Comment status updated");
        Ok(model)
    }

    pub async fn delete(&self, id: i32) -> ServiceResult<()> {
        let existing = self.find_live(id).await?;

        let mut active: comment::ActiveModel = existing.into();
        let now = Utc::now().fixed_offset();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        active.update(self.db).await?;

        info!(comment_id = id, "Comment deleted");
        Ok(())
    }

    pub async fn stats(&self) -> ServiceResult<CommentStats> {
        let counts: Vec<(CommentStatus, i64)> = comment::Entity::find()
            .select_only()
            .column(comment::Column::Status)
            .column_as(comment::Column::Id.count(), "n")
            .filter(comment::Column::DeletedAt.is_null())
            .group_by(comment::Column::Status)
            .into_tuple()
            .all(self.db)
            .await?;

        let mut stats = CommentStats::default();
        for (status, n) in counts {
            let n = n as u64;
            match status {
                CommentStatus::Pending => stats.pending = n,
                CommentStatus::Approved => stats.approved = n,
                CommentStatus::Hidden => stats.hidden = n,
            }
            stats.total += n;
        }
        Ok(stats)
    }

    async fn find_live(&self, id: i32) -> ServiceResult<comment::Model> {
        comment::Entity::find_by_id(id)
            .filter(comment::Column::DeletedAt.is_null())
            .one(self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Comment"))
    }
}
