pub mod prelude;

pub mod comment;
pub mod config;
pub mod file;
pub mod post;
pub mod post_tag;
pub mod tag;
pub mod user;
