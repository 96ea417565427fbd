//! Process-level errors raised while bootstrapping and serving.

use std::error::Error as StdError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(Box<dyn StdError + Send + Sync>),

    #[error("Migration error: {0}")]
    Migration(Box<dyn StdError + Send + Sync>),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
