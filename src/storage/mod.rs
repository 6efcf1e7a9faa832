//! Storage backend abstraction for uploaded files.
//!
//! Supports multiple backends:
//! - `local`: Local filesystem storage
//! - `s3`: S3-compatible object storage (MinIO, AWS S3, etc.)
//!
//! The core treats the URL returned from `store` as opaque and persists it
//! verbatim; deletion is keyed by that same URL.

pub mod local;
pub mod s3;

use async_trait::async_trait;
use once_cell::sync::OnceCell;

/// Storage operation errors.
#[derive(Debug)]
pub enum StorageError {
    /// File not found
    NotFound(String),
    /// I/O error
    Io(std::io::Error),
    /// S3 error
    S3(String),
    /// Unusable file name (no extension etc.)
    InvalidName(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::NotFound(msg) => write!(f, "Not found: {}", msg),
            StorageError::Io(e) => write!(f, "I/O error: {}", e),
            StorageError::S3(msg) => write!(f, "S3 error: {}", msg),
            StorageError::InvalidName(msg) => write!(f, "Invalid file name: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::NotFound {
            StorageError::NotFound(e.to_string())
        } else {
            StorageError::Io(e)
        }
    }
}

/// Trait for storage backends.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Store a file under `subdirectory` and return its public URL.
    async fn store(
        &self,
        data: Vec<u8>,
        subdirectory: &str,
        filename: &str,
    ) -> Result<String, StorageError>;

    /// Delete the file a previous `store` call returned `url` for.
    /// `Ok(false)` means the file was already gone.
    async fn delete(&self, url: &str) -> Result<bool, StorageError>;
}

/// Global file store, selected from configuration at startup
static FILE_STORE: OnceCell<Box<dyn FileStore>> = OnceCell::new();

pub fn init_file_store(store: Box<dyn FileStore>) {
    if FILE_STORE.set(store).is_err() {
        panic!("init_file_store() called more than once.");
    }
}

pub fn get_file_store() -> &'static dyn FileStore {
    FILE_STORE
        .get()
        .expect("File store not initialized.")
        .as_ref()
}

/// Generate a unique stored filename, keeping the upload's extension.
/// Returns an error when the original name carries no extension.
pub fn unique_filename(original: &str) -> Result<String, StorageError> {
    match original.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
            Ok(format!("{}.{}", uuid::Uuid::new_v4(), ext))
        }
        _ => Err(StorageError::InvalidName(original.to_string())),
    }
}

/// Split a stored-file URL into its (subdirectory, filename) tail.
pub(crate) fn url_tail(url: &str) -> Option<(String, String)> {
    let parsed = url::Url::parse(url).ok()?;
    let mut segments: Vec<&str> = parsed.path_segments()?.collect();
    let filename = segments.pop()?.to_string();
    let subdirectory = segments.pop()?.to_string();
    if filename.is_empty() || subdirectory.is_empty() {
        return None;
    }
    Some((subdirectory, filename))
}
