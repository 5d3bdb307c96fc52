use crate::core::cache::KeyValueCollection;
use anyhow::Result;
use async_trait::async_trait;
use fjall::{Keyspace, PartitionHandle, PersistMode};
use std::sync::Arc;
use tracing::debug;

/// Collection stored in a fjall partition.
pub struct DiskCollection {
    keyspace: Arc<Keyspace>,
    partition: PartitionHandle,
}

impl DiskCollection {
    pub fn new(keyspace: Arc<Keyspace>, partition: PartitionHandle) -> Self {
        Self {
            keyspace,
            partition,
        }
    }

    fn flush(&self) -> Result<()> {
        self.keyspace.persist(PersistMode::SyncAll)?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueCollection for DiskCollection {
    async fn get(&self, key: &str) -> Option<Vec<u8>> {
        match self.partition.get(key) {
            Ok(Some(value)) => {
                debug!("Store HIT for key: {key}");
                Some(value.to_vec())
            }
            Ok(None) => {
                debug!("Store MISS for key: {key}");
                None
            }
            Err(e) => {
                debug!("DiskCollection get error: {}", e);
                None
            }
        }
    }

    async fn put(&self, key: &str, value: Vec<u8>) {
        let res: Result<()> = (|| {
            self.partition.insert(key, value)?;
            self.flush()
        })();
        match res {
            Ok(()) => debug!("Store PUT for key: {key}"),
            Err(e) => debug!("DiskCollection put error: {}", e),
        }
    }

    async fn remove(&self, key: &str) {
        let res: Result<()> = (|| {
            self.partition.remove(key)?;
            self.flush()
        })();
        if let Err(e) = res {
            debug!("DiskCollection remove error: {}", e);
        }
    }

    async fn clear(&self) {
        let res: Result<()> = (|| {
            let keys = self
                .partition
                .keys()
                .collect::<std::result::Result<Vec<_>, _>>()?;
            for key in keys {
                self.partition.remove(key)?;
            }
            self.flush()
        })();
        if let Err(e) = res {
            debug!("DiskCollection clear error: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fjall::PartitionCreateOptions;
    use tempfile::tempdir;

    fn open(path: &std::path::Path) -> DiskCollection {
        let keyspace = Arc::new(fjall::Config::new(path).open().unwrap());
        let partition = keyspace
            .open_partition("test", PartitionCreateOptions::default())
            .unwrap();
        DiskCollection::new(keyspace, partition)
    }

    #[tokio::test]
    async fn test_disk_collection_get_put() {
        let dir = tempdir().unwrap();
        let collection = open(dir.path());

        assert!(collection.get("key1").await.is_none());

        collection.put("key1", b"123".to_vec()).await;

        assert_eq!(collection.get("key1").await, Some(b"123".to_vec()));
        assert!(collection.get("key2").await.is_none());
    }

    #[tokio::test]
    async fn test_disk_collection_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let collection = open(dir.path());
            collection.put("key1", b"50".to_vec()).await;
        }
        let collection = open(dir.path());
        assert_eq!(collection.get("key1").await, Some(b"50".to_vec()));
    }

    #[tokio::test]
    async fn test_disk_collection_remove_and_clear() {
        let dir = tempdir().unwrap();
        let collection = open(dir.path());

        collection.put("key1", b"1".to_vec()).await;
        collection.put("key2", b"2".to_vec()).await;
        collection.remove("key1").await;
        assert!(collection.get("key1").await.is_none());
        assert!(collection.get("key2").await.is_some());

        collection.clear().await;
        assert!(collection.get("key2").await.is_none());
    }
}
