use std::sync::Arc;

use crate::api::blog::Blog;

#[derive(Clone)]
pub struct AppState {
    pub blog: Arc<Blog>,
}

impl AppState {
    pub fn new(blog: Blog) -> Self {
        Self {
            blog: Arc::new(blog),
        }
    }
}
