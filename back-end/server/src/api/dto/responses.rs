use std::collections::BTreeMap;

use entity::comment::CommentStatus;
use entity::{comment, file, post, tag, user};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;

use crate::modules::comments::{CommentStats, CommentWithPost};
use crate::modules::pagination::PageMeta;
use crate::modules::posts::PostWithTags;
use crate::modules::settings::FooterLink;
use crate::modules::tags::TagWithCount;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================================================
// Auth / Settings
// ============================================================================

#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
}

impl From<user::Model> for UserSummary {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            is_admin: user.is_admin,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserSummary,
}

#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub configs: BTreeMap<String, String>,
    pub footer_links: Vec<FooterLink>,
}

// ============================================================================
// Posts / Tags
// ============================================================================

#[derive(Debug, Serialize)]
pub struct TagResponse {
    pub id: i32,
    pub name: String,
    pub color: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl From<tag::Model> for TagResponse {
    fn from(tag: tag::Model) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
            color: tag.color,
            created_at: tag.created_at,
            updated_at: tag.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TagWithCountResponse {
    #[serde(flatten)]
    pub tag: TagResponse,
    pub post_count: u64,
}

impl From<TagWithCount> for TagWithCountResponse {
    fn from(entry: TagWithCount) -> Self {
        Self {
            tag: entry.tag.into(),
            post_count: entry.post_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub summary: String,
    pub slug: String,
    pub published: bool,
    pub view_count: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub tags: Vec<TagResponse>,
}

impl From<PostWithTags> for PostResponse {
    fn from(entry: PostWithTags) -> Self {
        let post = entry.post;
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            summary: post.summary,
            slug: post.slug,
            published: post.published,
            view_count: post.view_count,
            created_at: post.created_at,
            updated_at: post.updated_at,
            tags: entry.tags.into_iter().map(TagResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostListResponse {
    pub posts: Vec<PostResponse>,
    pub pagination: PageMeta,
}

impl PostListResponse {
    pub fn new(posts: Vec<PostWithTags>, pagination: PageMeta) -> Self {
        Self {
            posts: posts.into_iter().map(PostResponse::from).collect(),
            pagination,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TagPostsResponse {
    pub tag: TagResponse,
    pub posts: Vec<PostResponse>,
    pub pagination: PageMeta,
}

// ============================================================================
// Comments
// ============================================================================

/// Public view; contact and request details stay private.
#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: i32,
    pub post_id: i32,
    pub name: String,
    pub content: String,
    pub status: CommentStatus,
    pub created_at: DateTimeWithTimeZone,
}

impl From<comment::Model> for CommentResponse {
    fn from(comment: comment::Model) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            name: comment.name,
            content: comment.content,
            status: comment.status,
            created_at: comment.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostRef {
    pub id: i32,
    pub title: String,
    pub slug: String,
}

impl From<post::Model> for PostRef {
    fn from(post: post::Model) -> Self {
        Self {
            id: post.id,
            title: post.title,
            slug: post.slug,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AdminCommentResponse {
    pub id: i32,
    pub post_id: i32,
    pub name: String,
    pub email: Option<String>,
    pub content: String,
    pub status: CommentStatus,
    pub ip_address: String,
    pub referer: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    /// `null` once the post has been deleted
    pub post: Option<PostRef>,
}

impl From<CommentWithPost> for AdminCommentResponse {
    fn from(entry: CommentWithPost) -> Self {
        let comment = entry.comment;
        Self {
            id: comment.id,
            post_id: comment.post_id,
            name: comment.name,
            email: comment.email,
            content: comment.content,
            status: comment.status,
            ip_address: comment.ip_address,
            referer: comment.referer,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
            post: entry.post.map(PostRef::from),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CommentListResponse {
    pub comments: Vec<CommentResponse>,
}

#[derive(Debug, Serialize)]
pub struct CommentCreatedResponse {
    pub message: String,
    pub comment: CommentResponse,
}

#[derive(Debug, Serialize)]
pub struct AdminCommentListResponse {
    pub comments: Vec<AdminCommentResponse>,
    pub pagination: PageMeta,
}

#[derive(Debug, Serialize)]
pub struct AdminCommentDetailResponse {
    pub comment: AdminCommentResponse,
}

#[derive(Debug, Serialize)]
pub struct CommentStatsResponse {
    pub stats: CommentStats,
}

// ============================================================================
// Files
// ============================================================================

#[derive(Debug, Serialize)]
pub struct FileResponse {
    pub id: i32,
    pub post_id: i32,
    pub original_file_name: String,
    pub display_name: String,
    pub description: String,
    pub server_path: String,
    /// Public download path under `/uploads`
    pub url: String,
    pub file_size: i64,
    pub mime_type: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl From<file::Model> for FileResponse {
    fn from(file: file::Model) -> Self {
        Self {
            url: format!("/uploads/{}", file.server_path),
            id: file.id,
            post_id: file.post_id,
            original_file_name: file.original_file_name,
            display_name: file.display_name,
            description: file.description,
            server_path: file.server_path,
            file_size: file.file_size,
            mime_type: file.mime_type,
            created_at: file.created_at,
            updated_at: file.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FileListResponse {
    pub files: Vec<FileResponse>,
    pub pagination: PageMeta,
}
