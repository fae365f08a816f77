//! Object storage for generated artwork.
//!
//! A narrow provider trait with an S3 implementation for production and an
//! in-memory one for tests. Paths are derived from slide, prompt, variation,
//! and a timestamp, so a write never overwrites prior art.

pub mod memory;
pub mod s3;

use async_trait::async_trait;

pub use memory::MemoryStorage;
pub use s3::S3Storage;

/// Errors from the storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage upload failed: {0}")]
    Upload(String),
}

/// Write-only object store. Returns the public URL of the stored object.
#[async_trait]
pub trait StorageProvider: Send + Sync {
    async fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError>;
}

/// Storage path for one generated variation.
///
/// Includes a millisecond timestamp so repeated runs for the same slide,
/// prompt, and variation index land at distinct paths.
pub fn generation_path(slide_id: i64, prompt_id: i64, variation: u32, timestamp_ms: i64) -> String {
    format!("slides/{slide_id}/prompts/{prompt_id}/v{variation}_{timestamp_ms}.png")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_paths_are_unique_per_timestamp() {
        let a = generation_path(1, 2, 0, 1000);
        let b = generation_path(1, 2, 0, 1001);
        assert_ne!(a, b);
        assert_eq!(a, "slides/1/prompts/2/v0_1000.png");
    }
}
