/// Object storage for uploaded media
///
/// Mirrors the shape of the database layer: a small trait, an S3-backed
/// implementation for deployment, and an in-memory implementation for the
/// `memory` storage mode and tests.
pub mod memory;
pub mod s3;

use anyhow::Result;
use std::sync::Arc;

pub use memory::MemoryMediaStorage;
pub use s3::S3MediaStorage;

/// Shared handle to the configured object storage implementation.
pub type MediaStorageHandle = Arc<dyn MediaStorage>;

/// Accepts a binary blob, hands back a public URL; deletes by key.
#[async_trait::async_trait]
pub trait MediaStorage: Send + Sync {
    /// Store an object and return the public URL it is reachable under.
    async fn put_object(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String>;

    /// Remove a stored object. Removing a missing key is not an error.
    async fn delete_object(&self, key: &str) -> Result<()>;
}
