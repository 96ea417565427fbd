//! Slug derivation for posts.
//!
//! `sanitize` is pure; `ensure_unique` probes the store for the first free
//! `base`, `base-1`, `base-2`, ... candidate.

use entity::post;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};

use crate::modules::error::{ServiceError, ServiceResult};

pub const MAX_SLUG_CHARS: usize = 100;
pub const MAX_SUFFIX_ATTEMPTS: u32 = 1000;
pub const FALLBACK_SLUG: &str = "post";

/// First code point of each Basic Multilingual Plane decimal digit run
/// (general category Nd). Every run is ten consecutive digits.
const DECIMAL_DIGIT_ZEROS: &[u32] = &[
    0x0030, 0x0660, 0x06F0, 0x07C0, 0x0966, 0x09E6, 0x0A66, 0x0AE6, 0x0B66, 0x0BE6, 0x0C66,
    0x0CE6, 0x0D66, 0x0DE6, 0x0E50, 0x0ED0, 0x0F20, 0x1040, 0x1090, 0x17E0, 0x1810, 0x1946,
    0x19D0, 0x1A80, 0x1A90, 0x1B50, 0x1BB0, 0x1C40, 0x1C50, 0xA620, 0xA8D0, 0xA900, 0xA9D0,
    0xA9F0, 0xAA50, 0xABF0, 0xFF10,
];

/// Turn arbitrary text into a URL-safe slug.
///
/// Letters and decimal digits are kept in any script (lowercased);
/// whitespace, `-` and `_` become a single `-`; everything else, including
/// numeric symbols such as `²`, `½` or `Ⅻ`, is dropped. The result is
/// capped at [`MAX_SLUG_CHARS`] characters and never empty.
pub fn sanitize(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for ch in input.chars().flat_map(char::to_lowercase) {
        if is_slug_char(ch) {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else if ch.is_whitespace() || ch == '-' || ch == '_' {
            pending_dash = true;
        }
    }

    let mut slug: String = slug.chars().take(MAX_SLUG_CHARS).collect();
    while slug.ends_with('-') {
        slug.pop();
    }

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

fn is_slug_char(ch: char) -> bool {
    (ch.is_alphabetic() && !ch.is_numeric()) || is_decimal_digit(ch)
}

fn is_decimal_digit(ch: char) -> bool {
    let cp = ch as u32;
    DECIMAL_DIGIT_ZEROS
        .iter()
        .any(|&zero| (zero..zero + 10).contains(&cp))
}

/// Find the first slug derived from `base` that no post row uses.
///
/// `except` is the id of the post being updated; its own slug never counts
/// as taken. Soft-deleted posts still hold their slug because the unique
/// index spans every row.
pub async fn ensure_unique<C>(conn: &C, base: &str, except: Option<i32>) -> ServiceResult<String>
where
    C: ConnectionTrait,
{
    if !slug_taken(conn, base, except).await? {
        return Ok(base.to_string());
    }

    for n in 1..=MAX_SUFFIX_ATTEMPTS {
        let candidate = format!("{}-{}", base, n);
        if !slug_taken(conn, &candidate, except).await? {
            return Ok(candidate);
        }
    }

    Err(ServiceError::SlugGeneration(base.to_string()))
}

async fn slug_taken<C>(conn: &C, slug: &str, except: Option<i32>) -> ServiceResult<bool>
where
    C: ConnectionTrait,
{
    let mut query = post::Entity::find().filter(post::Column::Slug.eq(slug));
    if let Some(id) = except {
        query = query.filter(post::Column::Id.ne(id));
    }
    Ok(query.count(conn).await? > 0)
}
