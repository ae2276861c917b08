//! End-to-end card store scenarios over the in-memory and SQLite backends
//!
//! Run with: cargo test --package nfcard-storage --test card_store_scenarios

use nfcard_core::{BusinessCard, DuplicatePolicy};
use nfcard_storage::{
    BlobCardRepository, CardRepository, CardStore, Database, MemoryKeyValueStore, SaveOutcome,
    StorageError, StorageResult, StoreConfig,
};
use rstest::rstest;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("nfcard_storage=debug")
        .with_test_writer()
        .try_init();
}

fn store_with(policy: DuplicatePolicy) -> CardStore<BlobCardRepository<MemoryKeyValueStore>> {
    CardStore::new(BlobCardRepository::new(
        MemoryKeyValueStore::new(),
        StoreConfig::default().duplicate_policy(policy),
    ))
}

#[tokio::test]
async fn test_same_name_and_phone_is_already_exists() {
    init_tracing();
    let store = CardStore::in_memory();

    let first = store
        .save(&BusinessCard::builder("Jane Doe").phone("555-1111").build())
        .await;
    let first_id = first.card().and_then(|c| c.id.clone());
    assert!(first.is_saved());

    let second = store
        .save(
            &BusinessCard::builder("Jane Doe")
                .phone("555-1111")
                .email("jane@x.com")
                .build(),
        )
        .await;

    assert_eq!(
        second,
        SaveOutcome::AlreadyExists {
            existing_id: first_id
        }
    );
    assert_eq!(store.count().await, 1);
}

#[tokio::test]
async fn test_repeated_save_does_not_grow_store() {
    let store = CardStore::in_memory();
    let card = BusinessCard::builder("John Roe")
        .email("john@x.io")
        .company("Initech")
        .build();

    assert!(store.save(&card).await.is_saved());
    for _ in 0..3 {
        assert!(!store.save(&card).await.is_saved());
    }
    assert_eq!(store.count().await, 1);
}

#[tokio::test]
async fn test_delete_middle_of_three_keeps_order() {
    init_tracing();
    let store = CardStore::in_memory();

    let mut saved = Vec::new();
    for name in ["Ada", "Grace", "Linus"] {
        let outcome = store.save(&BusinessCard::new(name)).await;
        saved.push(outcome.card().cloned().unwrap());
    }

    let names: Vec<_> = store.get_all().await.into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["Ada", "Grace", "Linus"]);

    let middle = saved[1].id.clone().unwrap();
    assert!(store.delete_by_id(&middle).await);

    let remaining = store.get_all().await;
    assert_eq!(remaining, vec![saved[0].clone(), saved[2].clone()]);
    assert!(remaining.iter().all(|c| c.id.as_deref() != Some(middle.as_str())));
}

#[tokio::test]
async fn test_update_replaces_content_and_keeps_identity() {
    let store = CardStore::in_memory();
    let original = store
        .save(&BusinessCard::builder("Jane Doe").phone("555-1111").build())
        .await
        .card()
        .cloned()
        .unwrap();

    let mut edited = original.clone();
    edited.title = "CTO".to_string();
    edited.phone = "555-2222".to_string();
    edited.additional_websites = vec!["https://jane.example".to_string()];
    assert!(store.update(&edited).await);

    let stored = store
        .find_by_id(original.id.as_deref().unwrap())
        .await
        .unwrap();
    assert_eq!(stored.id, original.id);
    assert_eq!(stored.created_at, original.created_at);
    assert_eq!(stored.title, "CTO");
    assert_eq!(stored.phone, "555-2222");
    assert_eq!(stored.additional_websites, vec!["https://jane.example"]);
    assert!(stored.updated_at >= original.updated_at);
}

#[tokio::test]
async fn test_update_without_id_or_unknown_id_is_false() {
    let store = CardStore::in_memory();
    store.save(&BusinessCard::new("Jane Doe")).await;

    assert!(!store.update(&BusinessCard::new("Jane Doe")).await);

    let mut ghost = BusinessCard::new("Ghost");
    ghost.id = Some("missing".to_string());
    assert!(!store.update(&ghost).await);
    assert_eq!(store.count().await, 1);
}

#[rstest]
#[case::default_policy(DuplicatePolicy::NameAndContact, 1)]
#[case::non_empty_contact(DuplicatePolicy::NameAndNonEmptyContact, 2)]
#[case::disabled(DuplicatePolicy::Disabled, 2)]
#[tokio::test]
async fn test_name_only_cards_under_each_policy(
    #[case] policy: DuplicatePolicy,
    #[case] expected: usize,
) {
    let store = store_with(policy);

    store.save(&BusinessCard::new("Jane Doe")).await;
    store.save(&BusinessCard::new("Jane Doe")).await;

    assert_eq!(store.count().await, expected);
}

#[tokio::test]
async fn test_import_batch_counts() {
    let store = CardStore::in_memory();
    store
        .save(&BusinessCard::builder("Jane Doe").phone("555-1111").build())
        .await;

    let summary = store
        .save_many(&[
            BusinessCard::builder("Jane Doe").phone("555-1111").build(),
            BusinessCard::builder("Ada").email("ada@x.io").build(),
            BusinessCard::new(""),
        ])
        .await;

    assert_eq!((summary.saved, summary.duplicates, summary.failed), (1, 1, 1));
    assert_eq!(store.count().await, 2);
}

#[tokio::test]
async fn test_sqlite_backend_runs_same_scenario() {
    init_tracing();
    let db = Database::in_memory().await.unwrap();
    let store = CardStore::sqlite(&db, StoreConfig::default());

    let a = store.save(&BusinessCard::new("Ada")).await.card().cloned().unwrap();
    let b = store.save(&BusinessCard::new("Grace")).await.card().cloned().unwrap();
    let c = store.save(&BusinessCard::new("Linus")).await.card().cloned().unwrap();

    assert!(store.delete_by_id(b.id.as_deref().unwrap()).await);
    assert!(!store.delete_by_id(b.id.as_deref().unwrap()).await);
    assert_eq!(store.get_all().await, vec![a, c]);

    db.close().await;
}

/// Repository whose every call fails, standing in for an unavailable platform store
struct UnavailableRepository;

impl CardRepository for UnavailableRepository {
    async fn find_all(&self) -> StorageResult<Vec<BusinessCard>> {
        Err(StorageError::Backend("offline".to_string()))
    }

    async fn find_by_id(&self, _id: &str) -> StorageResult<Option<BusinessCard>> {
        Err(StorageError::Backend("offline".to_string()))
    }

    async fn save(&self, _card: &BusinessCard) -> StorageResult<SaveOutcome> {
        Err(StorageError::Backend("offline".to_string()))
    }

    async fn update(&self, _card: &BusinessCard) -> StorageResult<BusinessCard> {
        Err(StorageError::Backend("offline".to_string()))
    }

    async fn delete(&self, _id: &str) -> StorageResult<()> {
        Err(StorageError::Backend("offline".to_string()))
    }

    async fn clear(&self) -> StorageResult<()> {
        Err(StorageError::Backend("offline".to_string()))
    }
}

#[tokio::test]
async fn test_injected_failing_repository_never_errors() {
    init_tracing();
    let store = CardStore::new(UnavailableRepository);
    let mut card = BusinessCard::new("Jane Doe");
    card.id = Some("abc".to_string());

    assert!(store.get_all().await.is_empty());
    assert_eq!(store.count().await, 0);
    assert_eq!(store.find_by_id("abc").await, None);
    assert_eq!(store.save(&card).await, SaveOutcome::Failed);
    assert!(!store.update(&card).await);
    assert!(!store.delete_by_id("abc").await);
    assert!(!store.clear_all().await);
    assert_eq!(store.save_many(&[card]).await.failed, 1);
}

#[tokio::test]
async fn test_scanned_card_with_blank_id_is_saved() {
    init_tracing();
    let store = CardStore::in_memory();
    let scanned =
        nfcard_codec::payload::decode(r#"{"id":"","name":"Jane Doe","phone":"555-1111"}"#)
            .unwrap();
    assert_eq!(scanned.id.as_deref(), Some(""));

    let outcome = store.save(&scanned).await;
    let stored = outcome.card().unwrap();
    assert!(stored.id.as_deref().is_some_and(|id| !id.is_empty()));
    assert_eq!(store.get_all().await.len(), 1);
}

#[tokio::test]
async fn test_unreadable_collection_accepts_new_cards() {
    init_tracing();
    let store = CardStore::new(BlobCardRepository::new(
        MemoryKeyValueStore::with_item("businessCards", "{not json"),
        StoreConfig::default(),
    ));
    assert!(store.get_all().await.is_empty());

    let ada = BusinessCard::builder("Ada").email("ada@x.io").build();
    assert!(store.save(&ada).await.is_saved());

    let cards = store.get_all().await;
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].name, "Ada");
    assert_eq!(
        store
            .repository()
            .backend()
            .raw("businessCards.corrupt")
            .await
            .as_deref(),
        Some("{not json")
    );
}
