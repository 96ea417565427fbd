pub mod auth;
pub mod comments;
pub mod feed;
pub mod files;
pub mod helpers;
pub mod settings;
