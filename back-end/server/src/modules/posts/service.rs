//! Post service layer.
//!
//! Create and update run inside a transaction so the slug probe, the row
//! write and the tag association commit together. A slug collision that
//! slips past the probe is rejected by the unique index and reported as
//! `ServiceError::Conflict`.

use chrono::Utc;
use entity::{post, tag};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{info, warn};

use crate::modules::error::{ServiceError, ServiceResult};
use crate::modules::pagination::{PageMeta, PageRequest};
use crate::modules::posts::slug;
use crate::modules::tags::associator;

const SLUG_CONFLICT: &str = "A post with this slug already exists";

// ============================================================================
// Domain Types
// ============================================================================

#[derive(Debug, Clone)]
pub struct PostWithTags {
    pub post: post::Model,
    pub tags: Vec<tag::Model>,
}

impl PostWithTags {
    /// Attach tags to each post, preserving the input order.
    pub async fn load<C>(conn: &C, posts: Vec<post::Model>) -> ServiceResult<Vec<Self>>
    where
        C: ConnectionTrait,
    {
        let mut tags = associator::load_for_posts(conn, &posts).await?;
        Ok(posts
            .into_iter()
            .map(|post| {
                let tags = tags.remove(&post.id).unwrap_or_default();
                PostWithTags { post, tags }
            })
            .collect())
    }

    async fn load_one<C>(conn: &C, post: post::Model) -> ServiceResult<Self>
    where
        C: ConnectionTrait,
    {
        let mut loaded = Self::load(conn, vec![post]).await?;
        loaded
            .pop()
            .ok_or_else(|| ServiceError::Internal("post vanished while loading tags".to_string()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct CreatePost {
    pub title: String,
    pub content: String,
    pub summary: String,
    /// Explicit slug; derived from the title when absent or blank
    pub slug: Option<String>,
    pub published: bool,
    pub tag_ids: Option<Vec<i32>>,
}

/// Partial update. `None` leaves a field untouched; `tag_ids: Some(vec![])`
/// removes every tag.
#[derive(Debug, Clone, Default)]
pub struct UpdatePost {
    pub title: Option<String>,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub slug: Option<String>,
    pub published: Option<bool>,
    pub tag_ids: Option<Vec<i32>>,
}

// ============================================================================
// Service
// ============================================================================

pub struct PostService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> PostService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Newest first. `published: None` returns drafts and published posts.
    pub async fn list(
        &self,
        page: PageRequest,
        published: Option<bool>,
    ) -> ServiceResult<(Vec<PostWithTags>, PageMeta)> {
        let mut query = post::Entity::find().filter(post::Column::DeletedAt.is_null());
        if let Some(published) = published {
            query = query.filter(post::Column::Published.eq(published));
        }

        let total = query.clone().count(self.db).await?;
        let posts = query
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .offset(page.offset())
            .limit(page.limit)
            .all(self.db)
            .await?;

        let posts = PostWithTags::load(self.db, posts).await?;
        Ok((posts, PageMeta::new(page, total)))
    }

    /// Latest published posts, used by the feed.
    pub async fn recent_published(&self, limit: u64) -> ServiceResult<Vec<PostWithTags>> {
        let posts = post::Entity::find()
            .filter(post::Column::DeletedAt.is_null())
            .filter(post::Column::Published.eq(true))
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .limit(limit)
            .all(self.db)
            .await?;
        PostWithTags::load(self.db, posts).await
    }

    /// Any non-deleted post, drafts included.
    pub async fn get(&self, id: i32) -> ServiceResult<PostWithTags> {
        let post = self.find_live(id).await?;
        PostWithTags::load_one(self.db, post).await
    }

    /// Public lookup by numeric id, falling back to slug. Counts a view.
    ///
    /// A failed view-count update is logged and does not fail the read.
    pub async fn get_published(&self, id_or_slug: &str) -> ServiceResult<PostWithTags> {
        let published = post::Entity::find()
            .filter(post::Column::DeletedAt.is_null())
            .filter(post::Column::Published.eq(true));

        let mut found = None;
        if let Ok(id) = id_or_slug.parse::<i32>() {
            found = published
                .clone()
                .filter(post::Column::Id.eq(id))
                .one(self.db)
                .await?;
        }
        if found.is_none() {
            found = published
                .filter(post::Column::Slug.eq(id_or_slug))
                .one(self.db)
                .await?;
        }
        let mut post = found.ok_or_else(|| ServiceError::not_found("Post"))?;

        match self.increment_views(post.id).await {
            Ok(()) => post.view_count += 1,
            Err(e) => warn!(post_id = post.id, error = %e, "Failed to increment view count"),
        }

        PostWithTags::load_one(self.db, post).await
    }

    /// A published, non-deleted post. Used to gate public comment access.
    pub async fn find_published(&self, id: i32) -> ServiceResult<post::Model> {
        post::Entity::find_by_id(id)
            .filter(post::Column::DeletedAt.is_null())
            .filter(post::Column::Published.eq(true))
            .one(self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Post not found or not published".to_string()))
    }

    pub async fn create(&self, req: CreatePost) -> ServiceResult<PostWithTags> {
        validate_title(&req.title)?;
        if req.content.trim().is_empty() {
            return Err(ServiceError::Validation("Content is required".to_string()));
        }

        let source = req
            .slug
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(&req.title);

        let txn = self.db.begin().await?;
        let slug = slug::ensure_unique(&txn, &slug::sanitize(source), None).await?;

        let now = Utc::now().fixed_offset();
        let post = post::ActiveModel {
            title: Set(req.title.trim().to_string()),
            content: Set(req.content),
            summary: Set(req.summary),
            slug: Set(slug),
            published: Set(req.published),
            view_count: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| ServiceError::from_write(e, SLUG_CONFLICT))?;

        if let Some(ids) = req.tag_ids {
            let tags = associator::resolve(&txn, &associator::dedup(&ids)).await?;
            associator::attach(&txn, post.id, &tags).await?;
        }

        let loaded = PostWithTags::load_one(&txn, post).await?;
        txn.commit().await?;

        info!(post_id = loaded.post.id, slug = %loaded.post.slug, "Post created");
        Ok(loaded)
    }

    pub async fn update(&self, id: i32, req: UpdatePost) -> ServiceResult<PostWithTags> {
        if let Some(title) = &req.title {
            validate_title(title)?;
        }
        if req.content.as_deref().is_some_and(|c| c.trim().is_empty()) {
            return Err(ServiceError::Validation("Content cannot be empty".to_string()));
        }

        let txn = self.db.begin().await?;

        let current = post::Entity::find_by_id(id)
            .filter(post::Column::DeletedAt.is_null())
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Post"))?;

        // A supplied slug wins, even a blank one (it sanitizes to the
        // fallback); otherwise a new title re-derives it.
        let requested_slug = match (&req.slug, &req.title) {
            (Some(s), _) => Some(slug::sanitize(s)),
            (None, Some(title)) => Some(slug::sanitize(title)),
            (None, None) => None,
        };

        let mut active: post::ActiveModel = current.clone().into();

        if let Some(candidate) = requested_slug.filter(|s| *s != current.slug) {
            active.slug = Set(slug::ensure_unique(&txn, &candidate, Some(id)).await?);
        }
        if let Some(title) = req.title {
            active.title = Set(title.trim().to_string());
        }
        if let Some(content) = req.content {
            active.content = Set(content);
        }
        if let Some(summary) = req.summary {
            active.summary = Set(summary);
        }
        if let Some(published) = req.published {
            active.published = Set(published);
        }
        active.updated_at = Set(Utc::now().fixed_offset());

        let post = active
            .update(&txn)
            .await
            .map_err(|e| ServiceError::from_write(e, SLUG_CONFLICT))?;

        if let Some(ids) = req.tag_ids {
            associator::replace(&txn, post.id, &ids).await?;
        }

        let loaded = PostWithTags::load_one(&txn, post).await?;
        txn.commit().await?;

        info!(post_id = id, slug = %loaded.post.slug, "Post updated");
        Ok(loaded)
    }

    /// Mark the post deleted. Its comments, files and tag links are kept.
    pub async fn soft_delete(&self, id: i32) -> ServiceResult<()> {
        let post = self.find_live(id).await?;

        let mut active: post::ActiveModel = post.into();
        let now = Utc::now().fixed_offset();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        active.update(self.db).await?;

        info!(post_id = id, "Post soft-deleted");
        Ok(())
    }

    async fn find_live(&self, id: i32) -> ServiceResult<post::Model> {
        post::Entity::find_by_id(id)
            .filter(post::Column::DeletedAt.is_null())
            .one(self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Post"))
    }

    async fn increment_views(&self, id: i32) -> ServiceResult<()> {
        post::Entity::update_many()
            .col_expr(
                post::Column::ViewCount,
                Expr::col(post::Column::ViewCount).add(1),
            )
            .filter(post::Column::Id.eq(id))
            .exec(self.db)
            .await?;
        Ok(())
    }
}

fn validate_title(title: &str) -> ServiceResult<()> {
    let len = title.trim().chars().count();
    if len == 0 {
        return Err(ServiceError::Validation("Title is required".to_string()));
    }
    if len > 200 {
        return Err(ServiceError::Validation(
            "Title must be at most 200 characters".to_string(),
        ));
    }
    Ok(())
}
