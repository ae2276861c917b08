//! Fail-safe card store used by screens.
//!
//! Screens never deal with storage errors: a failed read shows an empty
//! list and a failed write shows "not saved". [`CardStore`] wraps any
//! [`CardRepository`] with exactly that contract and logs every failure it
//! swallows.

use crate::backends::{MemoryKeyValueStore, SqliteKeyValueStore};
use crate::config::StoreConfig;
use crate::connection::Database;
use crate::error::StorageError;
use crate::repositories::{BlobCardRepository, CardRepository, SaveOutcome};
use nfcard_core::BusinessCard;
use tracing::{error, info, warn};

/// Card store over SQLite
pub type SqliteCardStore = CardStore<BlobCardRepository<SqliteKeyValueStore>>;

/// Card store over process memory
pub type MemoryCardStore = CardStore<BlobCardRepository<MemoryKeyValueStore>>;

/// Counts reported by [`CardStore::save_many`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub saved: usize,
    pub duplicates: usize,
    pub failed: usize,
}

impl ImportSummary {
    pub fn total(&self) -> usize {
        self.saved + self.duplicates + self.failed
    }
}

/// Card store that converts every failure into a safe default
///
/// | Operation | On failure |
/// |-----------|------------|
/// | [`get_all`](Self::get_all) | empty vector |
/// | [`save`](Self::save) | [`SaveOutcome::Failed`] |
/// | [`update`](Self::update), [`delete_by_id`](Self::delete_by_id), [`clear_all`](Self::clear_all) | `false` |
///
/// # Examples
///
/// ```
/// use nfcard_storage::CardStore;
/// use nfcard_core::BusinessCard;
///
/// # #[tokio::main]
/// # async fn main() {
/// let store = CardStore::in_memory();
///
/// let saved = store.save(&BusinessCard::builder("Jane Doe").phone("555-1111").build()).await;
/// let id = saved.card().unwrap().id.clone().unwrap();
///
/// assert_eq!(store.get_all().await.len(), 1);
/// assert!(store.delete_by_id(&id).await);
/// assert!(!store.delete_by_id(&id).await);
/// # }
/// ```
#[derive(Debug)]
pub struct CardStore<R> {
    repo: R,
}

impl MemoryCardStore {
    /// Store backed by a fresh in-memory slot with default configuration
    pub fn in_memory() -> Self {
        Self::new(BlobCardRepository::new(
            MemoryKeyValueStore::new(),
            StoreConfig::default(),
        ))
    }
}

impl SqliteCardStore {
    /// Store backed by the `kv_store` table of `db`
    pub fn sqlite(db: &Database, config: StoreConfig) -> Self {
        info!(
            "Card store using key '{}' with duplicate policy {}",
            config.storage_key, config.duplicate_policy
        );
        Self::new(BlobCardRepository::new(
            SqliteKeyValueStore::new(db.pool().clone()),
            config,
        ))
    }
}

impl<R: CardRepository> CardStore<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// The wrapped repository, for callers that want errors reported
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// All cards in insertion order; empty if nothing is stored or the
    /// stored data cannot be read
    pub async fn get_all(&self) -> Vec<BusinessCard> {
        match self.repo.find_all().await {
            Ok(cards) => cards,
            Err(e) => {
                error!("Failed to load business cards: {}", e);
                Vec::new()
            }
        }
    }

    /// Card with the given id, `None` if absent or unreadable
    pub async fn find_by_id(&self, id: &str) -> Option<BusinessCard> {
        match self.repo.find_by_id(id).await {
            Ok(card) => card,
            Err(e) => {
                error!("Failed to look up business card {}: {}", id, e);
                None
            }
        }
    }

    pub async fn count(&self) -> usize {
        self.get_all().await.len()
    }

    /// Save a card unless it duplicates a stored one
    pub async fn save(&self, card: &BusinessCard) -> SaveOutcome {
        match self.repo.save(card).await {
            Ok(outcome) => outcome,
            Err(StorageError::Validation(reason)) => {
                warn!("Rejected business card {:?}: {}", card.name, reason);
                SaveOutcome::Failed
            }
            Err(e) => {
                error!("Failed to save business card {:?}: {}", card.name, e);
                SaveOutcome::Failed
            }
        }
    }

    /// Save cards one by one, e.g. from a contacts import
    pub async fn save_many(&self, cards: &[BusinessCard]) -> ImportSummary {
        let mut summary = ImportSummary::default();
        for card in cards {
            match self.save(card).await {
                SaveOutcome::Saved(_) => summary.saved += 1,
                SaveOutcome::AlreadyExists { .. } => summary.duplicates += 1,
                SaveOutcome::Failed => summary.failed += 1,
            }
        }
        info!(
            "Imported {} cards: {} saved, {} duplicates, {} failed",
            summary.total(),
            summary.saved,
            summary.duplicates,
            summary.failed
        );
        summary
    }

    /// Replace the stored card with the same id; `false` if the card has no
    /// id, no stored card matches, or the write fails
    pub async fn update(&self, card: &BusinessCard) -> bool {
        match self.repo.update(card).await {
            Ok(_) => true,
            Err(e @ (StorageError::NotFound { .. } | StorageError::Validation(_))) => {
                warn!("Business card not updated: {}", e);
                false
            }
            Err(e) => {
                error!("Failed to update business card: {}", e);
                false
            }
        }
    }

    /// Delete the card with `id`; `false` if absent or the write fails
    pub async fn delete_by_id(&self, id: &str) -> bool {
        match self.repo.delete(id).await {
            Ok(()) => true,
            Err(StorageError::NotFound { .. }) => {
                warn!("Business card {} not found for deletion", id);
                false
            }
            Err(e) => {
                error!("Failed to delete business card {}: {}", id, e);
                false
            }
        }
    }

    /// Remove every stored card
    pub async fn clear_all(&self) -> bool {
        match self.repo.clear().await {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to clear business cards: {}", e);
                false
            }
        }
    }
}
