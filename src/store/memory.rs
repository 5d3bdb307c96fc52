use crate::core::cache::KeyValueCollection;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory collection; contents are lost with the process.
#[derive(Default)]
pub struct MemoryCollection {
    inner: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueCollection for MemoryCollection {
    async fn get(&self, key: &str) -> Option<Vec<u8>> {
        let entries = self.inner.lock().await;
        let value = entries.get(key).cloned();
        if value.is_some() {
            debug!("Store HIT for key: {key}");
        } else {
            debug!("Store MISS for key: {key}");
        }
        value
    }

    async fn put(&self, key: &str, value: Vec<u8>) {
        let mut entries = self.inner.lock().await;
        debug!("Store PUT for key: {key}");
        entries.insert(key.to_string(), value);
    }

    async fn remove(&self, key: &str) {
        let mut entries = self.inner.lock().await;
        entries.remove(key);
        debug!("Store REMOVE for key: {key}");
    }

    async fn clear(&self) {
        let mut entries = self.inner.lock().await;
        entries.clear();
        debug!("Store CLEAR");
    }
}
