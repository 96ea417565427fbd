use std::collections::BTreeMap;

use serde::Deserialize;
use validator::Validate;

use crate::modules::pagination::PageRequest;
use crate::modules::settings::FooterLink;

// ============================================================================
// Query Parameters
// ============================================================================

/// Paging and filter parameters. Values that fail to parse fall back to
/// their defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub published: Option<String>,
    pub status: Option<String>,
    pub post_id: Option<String>,
}

impl ListQuery {
    pub fn page_request(&self, default_limit: u64, max_limit: u64) -> PageRequest {
        PageRequest::new(
            parse_number(self.page.as_deref()),
            parse_number(self.limit.as_deref()),
            default_limit,
            max_limit,
        )
    }

    /// `true`/`false`; anything else is treated as absent.
    pub fn published_flag(&self) -> Option<bool> {
        match self.published.as_deref().map(str::trim) {
            Some("true") | Some("1") => Some(true),
            Some("false") | Some("0") => Some(false),
            _ => None,
        }
    }

    pub fn post_filter(&self) -> Option<i32> {
        self.post_id.as_deref().and_then(|s| s.trim().parse().ok())
    }
}

fn parse_number(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|s| s.trim().parse().ok())
}

#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    pub limit: Option<String>,
}

// ============================================================================
// Auth / Settings
// ============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 6, message = "New password must be at least 6 characters"))]
    pub new_password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateConfigRequest {
    pub configs: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateFooterLinksRequest {
    pub footer_links: Vec<FooterLink>,
}

// ============================================================================
// Posts / Tags
// ============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    #[serde(default)]
    pub summary: String,
    pub slug: Option<String>,
    #[serde(default)]
    pub published: bool,
    pub tag_ids: Option<Vec<i32>>,
}

/// Absent fields are left untouched. `tag_ids: []` clears every tag.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Content cannot be empty"))]
    pub content: Option<String>,
    pub summary: Option<String>,
    pub slug: Option<String>,
    pub published: Option<bool>,
    pub tag_ids: Option<Vec<i32>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTagRequest {
    #[validate(length(min = 1, max = 50, message = "Tag name must be 1-50 characters"))]
    pub name: String,
    pub color: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTagRequest {
    #[validate(length(min = 1, max = 50, message = "Tag name must be 1-50 characters"))]
    pub name: Option<String>,
    pub color: Option<String>,
}

// ============================================================================
// Comments / Files
// ============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    pub post_id: i32,
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    #[validate(length(max = 255, message = "Email must be at most 255 characters"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 5000, message = "Content must be 1-5000 characters"))]
    pub content: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCommentStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateFileRequest {
    pub display_name: Option<String>,
    pub description: Option<String>,
}
