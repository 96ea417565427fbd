//! RSS 2.0 feed of recent published posts.

pub mod rss;

pub use rss::{FeedService, clamp_limit};
