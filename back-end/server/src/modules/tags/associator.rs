//! Resolves tag ids and maintains the `post_tags` junction rows.
//!
//! All functions take any `ConnectionTrait` so callers can run them inside
//! the transaction that writes the post.

use std::collections::HashMap;

use entity::{post, post_tag, tag};
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, LoaderTrait, QueryFilter, QueryOrder, Set,
};
use tracing::debug;

use crate::modules::error::ServiceResult;

/// Fetch the tags whose ids appear in `ids`. Unknown ids are skipped.
pub async fn resolve<C>(conn: &C, ids: &[i32]) -> ServiceResult<Vec<tag::Model>>
where
    C: ConnectionTrait,
{
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let tags = tag::Entity::find()
        .filter(tag::Column::Id.is_in(ids.iter().copied()))
        .order_by_asc(tag::Column::Id)
        .all(conn)
        .await?;

    if tags.len() < ids.len() {
        debug!(requested = ids.len(), found = tags.len(), "Ignoring unknown tag ids");
    }

    Ok(tags)
}

/// Link `tags` to the post. The post must not already carry any of them.
pub async fn attach<C>(conn: &C, post_id: i32, tags: &[tag::Model]) -> ServiceResult<()>
where
    C: ConnectionTrait,
{
    if tags.is_empty() {
        return Ok(());
    }

    let rows = tags.iter().map(|t| post_tag::ActiveModel {
        post_id: Set(post_id),
        tag_id: Set(t.id),
    });

    post_tag::Entity::insert_many(rows).exec(conn).await?;
    Ok(())
}

/// Remove every tag association of a post.
pub async fn clear<C>(conn: &C, post_id: i32) -> ServiceResult<()>
where
    C: ConnectionTrait,
{
    post_tag::Entity::delete_many()
        .filter(post_tag::Column::PostId.eq(post_id))
        .exec(conn)
        .await?;
    Ok(())
}

/// Make `ids` (minus unknown ones) the exact tag set of a post.
pub async fn replace<C>(conn: &C, post_id: i32, ids: &[i32]) -> ServiceResult<Vec<tag::Model>>
where
    C: ConnectionTrait,
{
    clear(conn, post_id).await?;
    let tags = resolve(conn, &dedup(ids)).await?;
    attach(conn, post_id, &tags).await?;
    Ok(tags)
}

/// Remove a tag from every post that carries it.
pub async fn detach_tag<C>(conn: &C, tag_id: i32) -> ServiceResult<u64>
where
    C: ConnectionTrait,
{
    let result = post_tag::Entity::delete_many()
        .filter(post_tag::Column::TagId.eq(tag_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

/// Load the tags of each post, keyed by post id, each list sorted by name.
pub async fn load_for_posts<C>(
    conn: &C,
    posts: &[post::Model],
) -> ServiceResult<HashMap<i32, Vec<tag::Model>>>
where
    C: ConnectionTrait,
{
    if posts.is_empty() {
        return Ok(HashMap::new());
    }

    let tag_lists = posts
        .load_many_to_many(tag::Entity, post_tag::Entity, conn)
        .await?;

    Ok(posts
        .iter()
        .zip(tag_lists)
        .map(|(p, mut tags)| {
            tags.sort_by(|a, b| a.name.cmp(&b.name));
            (p.id, tags)
        })
        .collect())
}

pub(crate) fn dedup(ids: &[i32]) -> Vec<i32> {
    let mut unique = ids.to_vec();
    unique.sort_unstable();
    unique.dedup();
    unique
}
