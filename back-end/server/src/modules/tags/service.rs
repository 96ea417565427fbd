//! Tag service layer.

use chrono::Utc;
use entity::{post, post_tag, tag};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use tracing::info;

use crate::modules::error::{ServiceError, ServiceResult};
use crate::modules::pagination::{PageMeta, PageRequest};
use crate::modules::posts::PostWithTags;
use crate::modules::tags::associator;

/// Display palette used when a tag is created without a colour.
pub const PALETTE: [&str; 10] = [
    "#3B82F6", "#10B981", "#8B5CF6", "#F59E0B", "#EF4444", "#EC4899", "#06B6D4", "#84CC16",
    "#F97316", "#6366F1",
];

/// Pick a palette colour from the sum of the name's code points.
///
/// Different names may share a colour; it is only a display default.
pub fn default_color(name: &str) -> &'static str {
    let sum: u64 = name.chars().map(|c| c as u64).sum();
    PALETTE[(sum % PALETTE.len() as u64) as usize]
}

pub fn is_hex_color(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

#[derive(Debug, Clone)]
pub struct TagWithCount {
    pub tag: tag::Model,
    /// Published, non-deleted posts carrying the tag
    pub post_count: u64,
}

pub struct TagService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TagService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> ServiceResult<Vec<tag::Model>> {
        Ok(tag::Entity::find()
            .order_by_asc(tag::Column::Name)
            .all(self.db)
            .await?)
    }

    pub async fn list_with_counts(&self) -> ServiceResult<Vec<TagWithCount>> {
        let tags = self.list().await?;

        let counts: Vec<(i32, i64)> = post_tag::Entity::find()
            .select_only()
            .column(post_tag::Column::TagId)
            .column_as(Expr::col((post_tag::Entity, post_tag::Column::PostId)).count(), "post_count")
            .join(JoinType::InnerJoin, post_tag::Relation::Post.def())
            .filter(post::Column::Published.eq(true))
            .filter(post::Column::DeletedAt.is_null())
            .group_by(post_tag::Column::TagId)
            .into_tuple()
            .all(self.db)
            .await?;

        Ok(tags
            .into_iter()
            .map(|tag| {
                let post_count = counts
                    .iter()
                    .find(|(tag_id, _)| *tag_id == tag.id)
                    .map(|(_, n)| *n as u64)
                    .unwrap_or(0);
                TagWithCount { tag, post_count }
            })
            .collect())
    }

    pub async fn get(&self, id: i32) -> ServiceResult<tag::Model> {
        tag::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Tag"))
    }

    pub async fn create(&self, name: &str, color: Option<&str>) -> ServiceResult<tag::Model> {
        let name = normalize_name(name)?;
        let color = match color.map(str::trim).filter(|c| !c.is_empty()) {
            Some(c) => validate_color(c)?,
            None => default_color(&name).to_string(),
        };

        if self.name_taken(&name, None).await? {
            return Err(duplicate_name(&name));
        }

        let now = Utc::now().fixed_offset();
        let model = tag::ActiveModel {
            name: Set(name.clone()),
            color: Set(color),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await
        .map_err(|e| ServiceError::from_write(e, &duplicate_name(&name).to_string()))?;

        info!(tag_id = model.id, name = %model.name, "Tag created");
        Ok(model)
    }

    pub async fn update(
        &self,
        id: i32,
        name: Option<&str>,
        color: Option<&str>,
    ) -> ServiceResult<tag::Model> {
        let existing = self.get(id).await?;
        let mut active: tag::ActiveModel = existing.into();

        if let Some(name) = name {
            let name = normalize_name(name)?;
            if self.name_taken(&name, Some(id)).await? {
                return Err(duplicate_name(&name));
            }
            active.name = Set(name);
        }
        if let Some(color) = color {
            active.color = Set(validate_color(color.trim())?);
        }
        active.updated_at = Set(Utc::now().fixed_offset());

        let model = active
            .update(self.db)
            .await
            .map_err(|e| ServiceError::from_write(e, "A tag with this name already exists"))?;

        info!(tag_id = id, "Tag updated");
        Ok(model)
    }

    /// Detach the tag from every post, then delete it, in one transaction.
    pub async fn delete(&self, id: i32) -> ServiceResult<()> {
        let txn = self.db.begin().await?;

        let exists = tag::Entity::find_by_id(id).one(&txn).await?.is_some();
        if !exists {
            return Err(ServiceError::not_found("Tag"));
        }

        let detached = associator::detach_tag(&txn, id).await?;
        tag::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        info!(tag_id = id, detached, "Tag deleted");
        Ok(())
    }

    /// Posts carrying a tag, newest first. `published_only` hides drafts.
    pub async fn posts(
        &self,
        tag_id: i32,
        page: PageRequest,
        published_only: bool,
    ) -> ServiceResult<(tag::Model, Vec<PostWithTags>, PageMeta)> {
        let tag = self.get(tag_id).await?;

        let mut query = post::Entity::find()
            .join(JoinType::InnerJoin, post::Relation::PostTag.def())
            .filter(post_tag::Column::TagId.eq(tag_id))
            .filter(post::Column::DeletedAt.is_null());
        if published_only {
            query = query.filter(post::Column::Published.eq(true));
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
        Ok((tag, posts, PageMeta::new(page, total)))
    }

    async fn name_taken(&self, name: &str, except: Option<i32>) -> ServiceResult<bool> {
        let mut query = tag::Entity::find().filter(tag::Column::Name.eq(name));
        if let Some(id) = except {
            query = query.filter(tag::Column::Id.ne(id));
        }
        Ok(query.count(self.db).await? > 0)
    }
}

fn normalize_name(name: &str) -> ServiceResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ServiceError::Validation("Tag name is required".to_string()));
    }
    if name.chars().count() > 50 {
        return Err(ServiceError::Validation(
            "Tag name must be at most 50 characters".to_string(),
        ));
    }
    Ok(name.to_string())
}

fn validate_color(color: &str) -> ServiceResult<String> {
    if is_hex_color(color) {
        Ok(color.to_string())
    } else {
        Err(ServiceError::Validation(format!(
            "Invalid color '{}': expected a hex value such as #3B82F6",
            color
        )))
    }
}

fn duplicate_name(name: &str) -> ServiceError {
    ServiceError::Conflict(format!("Tag '{}' already exists", name))
}
