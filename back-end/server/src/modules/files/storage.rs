//! On-disk storage for uploaded files.
//!
//! Files are laid out as `<root>/YYYY/MM/<unix-nanos>.<ext>`. The path
//! relative to the root is what gets recorded in the database and what
//! `/uploads/...` serves.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{Datelike, Utc};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

const MAX_NAME_ATTEMPTS: i64 = 16;

#[derive(Debug, Clone)]
pub struct StoredFile {
    /// Forward-slash path relative to the upload root
    pub server_path: String,
    pub size: i64,
}

#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure_root(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.root).await
    }

    /// Write `bytes` under a fresh timestamp name, never overwriting.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> std::io::Result<StoredFile> {
        let now = Utc::now();
        let dir = format!("{:04}/{:02}", now.year(), now.month());
        fs::create_dir_all(self.root.join(&dir)).await?;

        let ext = extension_of(original_name);
        let base_nanos = now.timestamp_nanos_opt().unwrap_or_else(|| now.timestamp_micros() * 1000);

        for bump in 0..MAX_NAME_ATTEMPTS {
            let file_name = match &ext {
                Some(ext) => format!("{}.{}", base_nanos + bump, ext),
                None => format!("{}", base_nanos + bump),
            };
            let server_path = format!("{}/{}", dir, file_name);
            let full_path = self.root.join(&server_path);

            let mut file = match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&full_path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e),
            };

            if let Err(e) = write_all(&mut file, bytes).await {
                let _ = fs::remove_file(&full_path).await;
                return Err(e);
            }

            debug!(path = %server_path, size = bytes.len(), "Stored upload");
            return Ok(StoredFile {
                server_path,
                size: bytes.len() as i64,
            });
        }

        Err(std::io::Error::new(
            ErrorKind::AlreadyExists,
            "could not allocate a unique upload name",
        ))
    }

    /// Remove a stored file. Failures are logged, never returned.
    pub async fn remove(&self, server_path: &str) -> bool {
        match fs::remove_file(self.resolve(server_path)).await {
            Ok(()) => true,
            Err(e) => {
                warn!(path = %server_path, error = %e, "Failed to remove stored file");
                false
            }
        }
    }

    pub fn resolve(&self, server_path: &str) -> PathBuf {
        self.root.join(server_path)
    }
}

async fn write_all(file: &mut fs::File, bytes: &[u8]) -> std::io::Result<()> {
    file.write_all(bytes).await?;
    file.flush().await
}

/// Lowercased extension of a client file name, limited to ASCII
/// alphanumerics so it is safe to put on disk.
fn extension_of(name: &str) -> Option<String> {
    let ext = Path::new(name).extension()?.to_str()?;
    let ext: String = ext
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(16)
        .collect::<String>()
        .to_ascii_lowercase();
    (!ext.is_empty()).then_some(ext)
}
