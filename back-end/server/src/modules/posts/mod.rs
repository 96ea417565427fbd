//! Posts: slug assignment, tag association and visibility rules.

pub mod service;
pub mod slug;

pub use service::{CreatePost, PostService, PostWithTags, UpdatePost};
