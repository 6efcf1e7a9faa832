//! S3-compatible storage backend.

use super::{url_tail, FileStore, StorageError};
use async_trait::async_trait;
use rusoto_core::Region;
use rusoto_s3::{DeleteObjectRequest, PutObjectRequest, S3Client, S3};

/// S3-compatible storage backend.
pub struct S3Store {
    s3: S3Client,
    bucket_name: String,
    pub_url: String,
}

impl S3Store {
    /// Create a new S3 storage backend.
    pub fn new(region: Region, bucket_name: String, pub_url: String) -> S3Store {
        log::info!("S3Store initialized for bucket: {}", bucket_name);

        S3Store {
            s3: S3Client::new(region),
            bucket_name,
            pub_url: pub_url.trim_end_matches('/').to_string(),
        }
    }

    fn key(subdirectory: &str, filename: &str) -> String {
        format!("{}/{}", subdirectory, filename)
    }
}

#[async_trait]
impl FileStore for S3Store {
    async fn store(
        &self,
        data: Vec<u8>,
        subdirectory: &str,
        filename: &str,
    ) -> Result<String, StorageError> {
        let key = Self::key(subdirectory, filename);
        log::info!("S3Store: store: {}", key);

        let put_request = PutObjectRequest {
            bucket: self.bucket_name.clone(),
            key: key.clone(),
            body: Some(data.into()),
            ..Default::default()
        };

        self.s3
            .put_object(put_request)
            .await
            .map_err(|e| StorageError::S3(e.to_string()))?;

        Ok(format!("{}/{}", self.pub_url, key))
    }

    async fn delete(&self, url: &str) -> Result<bool, StorageError> {
        let (subdirectory, filename) =
            url_tail(url).ok_or_else(|| StorageError::NotFound(url.to_string()))?;
        let key = Self::key(&subdirectory, &filename);
        log::info!("S3Store: delete: {}", key);

        // S3 deletes are idempotent; a missing key is not an error.
        let delete_request = DeleteObjectRequest {
            bucket: self.bucket_name.clone(),
            key,
            ..Default::default()
        };

        self.s3
            .delete_object(delete_request)
            .await
            .map_err(|e| StorageError::S3(e.to_string()))?;

        Ok(true)
    }
}
