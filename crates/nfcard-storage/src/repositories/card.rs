#![allow(async_fn_in_trait)]

use crate::backends::KeyValueStore;
use crate::config::StoreConfig;
use crate::error::{StorageError, StorageResult};
use nfcard_core::{BusinessCard, now_millis};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Suffix of the key an unreadable collection is moved to before a save
/// starts a fresh one.
pub const CORRUPT_BACKUP_SUFFIX: &str = ".corrupt";

/// Result of saving a card
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The card was stored; carries the card with its assigned id and timestamps
    Saved(BusinessCard),

    /// A stored card already matches under the duplicate policy; nothing changed
    AlreadyExists { existing_id: Option<String> },

    /// The save did not happen (backend or validation failure)
    Failed,
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved(_))
    }

    /// The stored card, if this outcome saved one
    pub fn card(&self) -> Option<&BusinessCard> {
        match self {
            Self::Saved(card) => Some(card),
            _ => None,
        }
    }
}

/// Repository trait for business card operations
///
/// This is the injected capability behind the card store: production code
/// backs it with SQLite, tests with an in-memory backend. Every method
/// reports failures; [`CardStore`](crate::CardStore) turns them into safe
/// defaults for callers that must not see errors.
///
/// # Implementation Note
///
/// This trait uses native async trait methods (Edition 2024 feature),
/// eliminating the need for the async-trait crate.
pub trait CardRepository: Send + Sync {
    /// All cards in insertion order
    async fn find_all(&self) -> StorageResult<Vec<BusinessCard>>;

    /// Find a card by id
    async fn find_by_id(&self, id: &str) -> StorageResult<Option<BusinessCard>>;

    /// Store a new card unless the duplicate policy matches a stored one
    async fn save(&self, card: &BusinessCard) -> StorageResult<SaveOutcome>;

    /// Replace the stored card with the same id, returning the stored version
    async fn update(&self, card: &BusinessCard) -> StorageResult<BusinessCard>;

    /// Delete a card by id
    async fn delete(&self, id: &str) -> StorageResult<()>;

    /// Remove the whole collection
    async fn clear(&self) -> StorageResult<()>;
}

/// Card repository keeping the whole collection in one key-value slot
///
/// The slot holds a JSON array of cards. Every mutation reads the full
/// array, changes it and writes it back. Mutations on one repository are
/// serialized by an internal lock, so two concurrent saves both land.
/// Separate repository instances over the same slot are not coordinated.
///
/// # Examples
///
/// ```
/// use nfcard_storage::backends::MemoryKeyValueStore;
/// use nfcard_storage::repositories::{BlobCardRepository, CardRepository};
/// use nfcard_storage::StoreConfig;
/// use nfcard_core::BusinessCard;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let repo = BlobCardRepository::new(MemoryKeyValueStore::new(), StoreConfig::default());
///
/// let outcome = repo.save(&BusinessCard::builder("Jane Doe").phone("555-1111").build()).await?;
/// assert!(outcome.is_saved());
///
/// let again = repo.save(&BusinessCard::builder("Jane Doe").phone("555-1111").build()).await?;
/// assert!(!again.is_saved());
/// assert_eq!(repo.find_all().await?.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct BlobCardRepository<S> {
    backend: S,
    config: StoreConfig,
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore> BlobCardRepository<S> {
    /// Create a repository over `backend`
    pub fn new(backend: S, config: StoreConfig) -> Self {
        Self {
            backend,
            config,
            write_lock: Mutex::new(()),
        }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    async fn load(&self) -> StorageResult<Vec<BusinessCard>> {
        let Some(blob) = self.backend.get_item(&self.config.storage_key).await? else {
            return Ok(Vec::new());
        };

        let cards: Vec<BusinessCard> = serde_json::from_str(&blob)?;
        Ok(cards)
    }

    /// Load for a mutation that adds cards. An unreadable blob counts as no
    /// data; its raw value is copied to the backup key first.
    async fn load_or_recover(&self) -> StorageResult<Vec<BusinessCard>> {
        match self.load().await {
            Err(StorageError::Serialization(e)) => {
                let key = &self.config.storage_key;
                let backup_key = format!("{key}{CORRUPT_BACKUP_SUFFIX}");
                if let Some(blob) = self.backend.get_item(key).await? {
                    self.backend.set_item(&backup_key, &blob).await?;
                }
                warn!(
                    "Stored cards under {} are unreadable ({}), moved to {} and starting empty",
                    key, e, backup_key
                );
                Ok(Vec::new())
            }
            other => other,
        }
    }

    async fn persist(&self, cards: &[BusinessCard]) -> StorageResult<()> {
        let blob = serde_json::to_string(cards)?;
        self.backend
            .set_item(&self.config.storage_key, &blob)
            .await
    }

    fn check(&self, card: &BusinessCard) -> StorageResult<()> {
        if self.config.validate_on_write {
            card.validate()?;
        }
        Ok(())
    }
}

/// Keep a caller-supplied id only if it is usable and not taken.
fn assign_id(requested: Option<&str>, cards: &[BusinessCard]) -> String {
    match requested.map(str::trim) {
        Some(id) if !id.is_empty() && !cards.iter().any(|c| c.id.as_deref() == Some(id)) => {
            id.to_string()
        }
        Some(id) if !id.is_empty() => {
            warn!("Card id {} already in use, assigning a new one", id);
            BusinessCard::generate_id()
        }
        _ => BusinessCard::generate_id(),
    }
}

impl<S: KeyValueStore> CardRepository for BlobCardRepository<S> {
    async fn find_all(&self) -> StorageResult<Vec<BusinessCard>> {
        self.load().await
    }

    async fn find_by_id(&self, id: &str) -> StorageResult<Option<BusinessCard>> {
        let cards = self.load().await?;
        Ok(cards.into_iter().find(|c| c.id.as_deref() == Some(id)))
    }

    async fn save(&self, card: &BusinessCard) -> StorageResult<SaveOutcome> {
        let mut card = card.clone();
        if card.id.as_deref().is_some_and(|id| id.trim().is_empty()) {
            card.id = None;
        }
        self.check(&card)?;

        let _guard = self.write_lock.lock().await;
        let mut cards = self.load_or_recover().await?;

        if let Some(existing) = self
            .config
            .duplicate_policy
            .find_duplicate(&card, &cards)
        {
            debug!(
                "Card {:?} matches stored card {:?}, not saving",
                card.name, existing.id
            );
            return Ok(SaveOutcome::AlreadyExists {
                existing_id: existing.id.clone(),
            });
        }

        let now = now_millis();
        let created_at = card.created_at.unwrap_or(now);
        let mut stored = card;
        stored.id = Some(assign_id(stored.id.as_deref(), &cards));
        stored.created_at = Some(created_at);
        stored.updated_at = Some(now.max(created_at));

        cards.push(stored.clone());
        self.persist(&cards).await?;

        debug!("Saved card {:?} ({} total)", stored.id, cards.len());
        Ok(SaveOutcome::Saved(stored))
    }

    async fn update(&self, card: &BusinessCard) -> StorageResult<BusinessCard> {
        let id = card
            .id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| StorageError::Validation("card id is required for update".to_string()))?;

        let _guard = self.write_lock.lock().await;
        let mut cards = self.load().await?;

        let position = cards
            .iter()
            .position(|c| c.id.as_deref() == Some(id))
            .ok_or_else(|| StorageError::card_not_found(id))?;

        let previous = &cards[position];
        let created_at = previous.created_at.or(card.created_at);
        let floor = previous.updated_at.into_iter().chain(created_at).max();

        let mut updated = card.clone();
        updated.id = previous.id.clone();
        updated.created_at = created_at;
        updated.updated_at = Some(floor.map_or(now_millis(), |f| now_millis().max(f)));
        self.check(&updated)?;

        cards[position] = updated.clone();
        self.persist(&cards).await?;

        debug!("Updated card {}", id);
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> StorageResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut cards = self.load().await?;

        let before = cards.len();
        cards.retain(|c| c.id.as_deref() != Some(id));
        if cards.len() == before {
            return Err(StorageError::card_not_found(id));
        }

        self.persist(&cards).await?;
        debug!("Deleted card {} ({} remaining)", id, cards.len());
        Ok(())
    }

    async fn clear(&self) -> StorageResult<()> {
        let _guard = self.write_lock.lock().await;
        self.backend.remove_item(&self.config.storage_key).await?;
        debug!("Cleared all cards");
        Ok(())
    }
}
