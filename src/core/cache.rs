use async_trait::async_trait;
use std::sync::Arc;

/// A named key-value collection.
///
/// Failures are logged by implementations and reported as misses, so callers
/// treat a collection like a cache that may forget.
#[async_trait]
pub trait KeyValueCollection: Send + Sync {
    async fn get(&self, key: &str) -> Option<Vec<u8>>;
    async fn put(&self, key: &str, value: Vec<u8>);
    async fn remove(&self, key: &str);
    async fn clear(&self);
}

pub trait Store: Send + Sync {
    /// Returns the collection called `name`.
    ///
    /// `persist` selects a disk-backed collection. Returns `None` when the
    /// collection does not exist and `create_if_missing` is false, or when a
    /// persistent collection cannot be opened.
    fn get_collection(
        &self,
        name: &str,
        persist: bool,
        create_if_missing: bool,
    ) -> Option<Arc<dyn KeyValueCollection>>;

    fn remove_collection(&self, name: &str) -> bool;
}
