//! Tags and their association with posts.

pub mod associator;
pub mod service;

pub use service::{TagService, TagWithCount, default_color};
