pub mod service;

pub use service::{
    ClientMeta, CommentService, CommentStats, CommentWithPost, NewComment, parse_status_filter,
};
