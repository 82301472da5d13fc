use crate::storage::MediaStorage;
use anyhow::Result;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-process object storage for the `memory` storage mode and tests.
#[derive(Default)]
pub struct MemoryMediaStorage {
    objects: RwLock<HashMap<String, StoredObject>>,
}

struct StoredObject {
    bytes: Vec<u8>,
    content_type: String,
}

impl MemoryMediaStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects (test helper).
    pub async fn object_count(&self) -> usize {
        self.objects.read().await.len()
    }
}

#[async_trait::async_trait]
impl MediaStorage for MemoryMediaStorage {
    async fn put_object(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String> {
        let mut objects = self.objects.write().await;
        objects.insert(
            key.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(format!("memory://{}", key))
    }

    async fn delete_object(&self, key: &str) -> Result<()> {
        let mut objects = self.objects.write().await;
        objects.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_delete_round_trip() {
        let storage = MemoryMediaStorage::new();
        let url = storage
            .put_object("u1/photo.png", vec![1, 2, 3], "image/png")
            .await
            .unwrap();
        assert_eq!(url, "memory://u1/photo.png");
        assert_eq!(storage.object_count().await, 1);

        {
            let objects = storage.objects.read().await;
            let stored = objects.get("u1/photo.png").unwrap();
            assert_eq!(stored.bytes, vec![1, 2, 3]);
            assert_eq!(stored.content_type, "image/png");
        }

        storage.delete_object("u1/photo.png").await.unwrap();
        assert_eq!(storage.object_count().await, 0);

        // Deleting an already-removed key is a no-op.
        storage.delete_object("u1/photo.png").await.unwrap();
    }
}
