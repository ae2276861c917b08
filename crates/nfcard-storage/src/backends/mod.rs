//! Key-value backends holding the serialized card collection.
//!
//! The card repository needs nothing more than string slots addressed by
//! key. Keeping the seam this narrow lets tests run against
//! [`MemoryKeyValueStore`] while devices persist through
//! [`SqliteKeyValueStore`].

#![allow(async_fn_in_trait)]

pub mod memory;
pub mod sqlite;

pub use memory::MemoryKeyValueStore;
pub use sqlite::SqliteKeyValueStore;

use crate::error::StorageResult;

/// String key-value storage.
///
/// # Implementation Note
///
/// This trait uses native async trait methods (Edition 2024 feature), so it
/// is used through generics rather than `dyn KeyValueStore`.
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, `None` if the key is absent
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Create or replace the value under `key`
    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove `key`; removing an absent key succeeds
    async fn remove_item(&self, key: &str) -> StorageResult<()>;
}
