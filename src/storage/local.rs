//! Local filesystem storage backend.

use super::{url_tail, FileStore, StorageError};
use actix_web::web;
use async_trait::async_trait;
use std::fs;
use std::path::PathBuf;

/// Local filesystem storage backend.
///
/// Files land under `{base_path}/{subdirectory}/{filename}` and are served
/// from `{base_url}/uploads/{subdirectory}/{filename}`.
pub struct LocalStore {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStore {
    /// Create a new local storage backend.
    ///
    /// The `base_path` directory will be created if it doesn't exist.
    pub fn new(base_path: PathBuf, base_url: String) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path)?;
        log::info!("LocalStore initialized at {:?}", base_path);
        Ok(Self {
            base_path,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn file_path(&self, subdirectory: &str, filename: &str) -> PathBuf {
        self.base_path.join(subdirectory).join(filename)
    }
}

#[async_trait]
impl FileStore for LocalStore {
    async fn store(
        &self,
        data: Vec<u8>,
        subdirectory: &str,
        filename: &str,
    ) -> Result<String, StorageError> {
        let path = self.file_path(subdirectory, filename);
        log::info!("LocalStore: store: {:?}", path);

        // Use web::block for blocking file operations
        web::block(move || {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, data)
        })
        .await
        .map_err(|e| StorageError::Io(std::io::Error::other(e)))??;

        Ok(format!(
            "{}/uploads/{}/{}",
            self.base_url, subdirectory, filename
        ))
    }

    async fn delete(&self, url: &str) -> Result<bool, StorageError> {
        let (subdirectory, filename) =
            url_tail(url).ok_or_else(|| StorageError::NotFound(url.to_string()))?;
        let path = self.file_path(&subdirectory, &filename);
        log::info!("LocalStore: delete: {:?}", path);

        let removed = web::block(move || match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        })
        .await
        .map_err(|e| StorageError::Io(std::io::Error::other(e)))??;

        Ok(removed)
    }
}
