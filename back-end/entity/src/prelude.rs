pub use super::comment::Entity as Comment;
pub use super::config::Entity as Config;
pub use super::file::Entity as File;
pub use super::post::Entity as Post;
pub use super::post_tag::Entity as PostTag;
pub use super::tag::Entity as Tag;
pub use super::user::Entity as User;
