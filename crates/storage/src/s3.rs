//! S3 storage provider.

use async_trait::async_trait;

use crate::{StorageError, StorageProvider};

/// Stores objects in an S3 bucket and serves them from a public base URL
/// (the bucket's CDN distribution).
pub struct S3Storage {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base_url: String,
}

impl S3Storage {
    pub fn new(client: aws_sdk_s3::Client, bucket: String, public_base_url: String) -> Self {
        Self {
            client,
            bucket,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build a client from ambient AWS configuration plus `STORAGE_BUCKET`
    /// and `STORAGE_PUBLIC_URL`.
    pub async fn from_env() -> Self {
        let aws_config = aws_config::load_from_env().await;
        let client = aws_sdk_s3::Client::new(&aws_config);
        let bucket = std::env::var("STORAGE_BUCKET").unwrap_or_else(|_| "carousel-art".into());
        let public_base_url = std::env::var("STORAGE_PUBLIC_URL")
            .unwrap_or_else(|_| format!("https://{bucket}.s3.amazonaws.com"));
        Self::new(client, bucket, public_base_url)
    }
}

#[async_trait]
impl StorageProvider for S3Storage {
    async fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(path)
            .body(bytes.into())
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::Upload(e.to_string()))?;

        Ok(format!("{}/{path}", self.public_base_url))
    }
}
