pub mod auth;
pub mod comments;
pub mod error;
pub mod feed;
pub mod files;
pub mod pagination;
pub mod posts;
pub mod settings;
pub mod tags;
