//! Storage layer for nfcard business cards.
//!
//! The whole card collection lives as one JSON array in a single key-value
//! slot. This crate provides that slot on SQLite (and in memory for tests),
//! the repository that reads and rewrites the array, and the fail-safe
//! store that screens call.
//!
//! # Architecture
//!
//! ```text
//! CardStore            never errors: empty list / false / SaveOutcome::Failed
//!   └─ CardRepository  find_all, find_by_id, save, update, delete, clear
//!        └─ BlobCardRepository<S>   one JSON array under "businessCards"
//!             └─ KeyValueStore      SqliteKeyValueStore | MemoryKeyValueStore
//! ```
//!
//! - [`Database`] - Connection pool manager with automatic migrations
//! - [`KeyValueStore`] - String slots addressed by key
//! - [`CardRepository`] - Injected card capability reporting errors
//! - [`CardStore`] - Error-swallowing facade with logging
//!
//! # Duplicate Detection
//!
//! Saves consult the configured [`DuplicatePolicy`](nfcard_core::DuplicatePolicy)
//! and report [`SaveOutcome::AlreadyExists`] without touching storage when a
//! stored card matches.
//!
//! # Examples
//!
//! ```no_run
//! use nfcard_storage::{CardStore, Database, DatabaseConfig, StoreConfig};
//! use nfcard_core::BusinessCard;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::new(DatabaseConfig::new("cards.db")).await?;
//! let store = CardStore::sqlite(&db, StoreConfig::default());
//!
//! let card = BusinessCard::builder("Jane Doe").phone("555-1111").build();
//! if store.save(&card).await.is_saved() {
//!     println!("{} cards stored", store.count().await);
//! }
//! # Ok(())
//! # }
//! ```

pub mod backends;
pub mod config;
pub mod connection;
pub mod error;
pub mod repositories;
pub mod store;

pub use backends::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore};
pub use config::StoreConfig;
pub use connection::{Database, DatabaseConfig};
pub use error::{StorageError, StorageResult};
pub use repositories::{BlobCardRepository, CardRepository, SaveOutcome};
pub use store::{CardStore, ImportSummary, MemoryCardStore, SqliteCardStore};
