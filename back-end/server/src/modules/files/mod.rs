pub mod service;
pub mod storage;

pub use service::{FileService, FileUpdate, FileUpload};
pub use storage::{StoredFile, UploadStore};
