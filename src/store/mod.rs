pub mod disk;
pub mod memory;

use crate::core::cache::{KeyValueCollection, Store};
use disk::DiskCollection;
use fjall::{Keyspace, PartitionCreateOptions};
use memory::MemoryCollection;
use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, RwLock},
};
use tracing::{debug, warn};

/// A thread-safe key-value store that can hold multiple collections.
pub struct KeyValueStore {
    collections: RwLock<HashMap<String, Arc<dyn KeyValueCollection>>>,
    keyspace: Option<Arc<Keyspace>>,
}

impl KeyValueStore {
    /// Opens a store whose persistent collections live under `path`. When the
    /// keyspace cannot be opened, persistent collections are unavailable.
    pub fn open(path: &Path) -> Self {
        let keyspace = match fjall::Config::new(path).open() {
            Ok(keyspace) => Some(Arc::new(keyspace)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not open data store");
                None
            }
        };

        Self {
            collections: RwLock::new(HashMap::new()),
            keyspace,
        }
    }

    pub fn in_memory() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            keyspace: None,
        }
    }

    pub fn is_persistent(&self) -> bool {
        self.keyspace.is_some()
    }

    /// Persistent collection if available, in-memory otherwise.
    pub fn durable_or_memory(&self, name: &str) -> Arc<dyn KeyValueCollection> {
        self.get_collection(name, true, true).unwrap_or_else(|| {
            debug!(collection = name, "Falling back to an in-memory collection");
            let collection: Arc<dyn KeyValueCollection> = Arc::new(MemoryCollection::new());
            self.collections
                .write()
                .unwrap_or_else(|e| e.into_inner())
                .entry(name.to_string())
                .or_insert(collection)
                .clone()
        })
    }

    fn open_disk_collection(&self, name: &str) -> Option<Arc<dyn KeyValueCollection>> {
        let keyspace = self.keyspace.as_ref()?;
        match keyspace.open_partition(name, PartitionCreateOptions::default()) {
            Ok(partition) => Some(
                Arc::new(DiskCollection::new(keyspace.clone(), partition))
                    as Arc<dyn KeyValueCollection>,
            ),
            Err(e) => {
                warn!(collection = name, error = %e, "Could not open partition");
                None
            }
        }
    }
}

impl Store for KeyValueStore {
    fn get_collection(
        &self,
        name: &str,
        persist: bool,
        create_if_missing: bool,
    ) -> Option<Arc<dyn KeyValueCollection>> {
        if create_if_missing {
            let mut collections = self.collections.write().unwrap_or_else(|e| e.into_inner());
            if !collections.contains_key(name) {
                let new_collection = if persist {
                    self.open_disk_collection(name)
                } else {
                    Some(Arc::new(MemoryCollection::new()) as Arc<dyn KeyValueCollection>)
                };

                match new_collection {
                    Some(collection) => {
                        collections.insert(name.to_string(), collection);
                    }
                    None => return None,
                }
            }
        }

        let collections = self.collections.read().unwrap_or_else(|e| e.into_inner());
        collections.get(name).cloned()
    }

    fn remove_collection(&self, name: &str) -> bool {
        let mut collections = self.collections.write().unwrap_or_else(|e| e.into_inner());
        collections.remove(name).is_some()
    }
}
