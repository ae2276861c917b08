use super::KeyValueStore;
use crate::error::{StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// In-memory implementation of [`KeyValueStore`]
///
/// Clones share the same slots, so a test can hand one clone to a
/// repository and keep another to inspect or corrupt the stored blob.
/// Reads and writes can be made to fail to simulate an unavailable
/// backend.
///
/// # Examples
///
/// ```
/// use nfcard_storage::backends::{KeyValueStore, MemoryKeyValueStore};
///
/// # #[tokio::main]
/// # async fn main() {
/// let store = MemoryKeyValueStore::new();
/// store.set_item("k", "v").await.unwrap();
///
/// store.set_fail_writes(true);
/// assert!(store.set_item("k", "w").await.is_err());
/// assert_eq!(store.get_item("k").await.unwrap().as_deref(), Some("v"));
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    items: Arc<RwLock<HashMap<String, String>>>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with one slot
    pub fn with_item(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut items = HashMap::new();
        items.insert(key.into(), value.into());
        Self {
            items: Arc::new(RwLock::new(items)),
            ..Default::default()
        }
    }

    /// Make every subsequent read fail until reset
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent write or removal fail until reset
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Raw slot contents, bypassing failure injection
    pub async fn raw(&self, key: &str) -> Option<String> {
        self.items.read().await.get(key).cloned()
    }

    /// Number of slots
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Backend(format!("read of '{}' failed", key)));
        }
        Ok(self.items.read().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Backend(format!("write of '{}' failed", key)));
        }
        self.items
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> StorageResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Backend(format!("removal of '{}' failed", key)));
        }
        self.items.write().await.remove(key);
        Ok(())
    }
}
