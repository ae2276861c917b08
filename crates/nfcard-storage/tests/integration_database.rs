//! Integration tests for the SQLite database and key-value slot
//!
//! Run with: cargo test --package nfcard-storage --test integration_database

use nfcard_core::BusinessCard;
use nfcard_storage::{
    CardStore, Database, DatabaseConfig, KeyValueStore, SqliteKeyValueStore, StoreConfig,
};
use std::sync::Arc;
use tokio::sync::Barrier;

#[tokio::test]
async fn test_in_memory_database() {
    let db = Database::in_memory().await.unwrap();
    db.health_check().await.unwrap();
    db.close().await;
}

#[tokio::test]
async fn test_concurrent_pool_access() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pool.db");
    let db = Database::new(DatabaseConfig::new(path.to_string_lossy()))
        .await
        .unwrap();

    const NUM_CONCURRENT_TASKS: usize = 8;
    let barrier = Arc::new(Barrier::new(NUM_CONCURRENT_TASKS));

    let mut handles = vec![];
    for i in 0..NUM_CONCURRENT_TASKS {
        let db = db.clone();
        let barrier = barrier.clone();

        handles.push(tokio::spawn(async move {
            barrier.wait().await;
            let kv = SqliteKeyValueStore::new(db.pool().clone());
            kv.set_item(&format!("key-{i}"), &i.to_string()).await
        }));
    }

    for result in futures::future::join_all(handles).await {
        result.unwrap().unwrap();
    }

    let kv = SqliteKeyValueStore::new(db.pool().clone());
    assert_eq!(kv.keys().await.unwrap().len(), NUM_CONCURRENT_TASKS);
    assert_eq!(kv.get_item("key-3").await.unwrap().as_deref(), Some("3"));

    db.close().await;
}

#[tokio::test]
async fn test_migration_idempotency() {
    let db = Database::in_memory().await.unwrap();

    db.migrate().await.unwrap();
    db.migrate().await.unwrap();

    let result: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='kv_store'")
            .fetch_one(db.pool())
            .await
            .unwrap();

    assert_eq!(result.0, 1);

    db.close().await;
}

#[tokio::test]
async fn test_creates_missing_parent_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("deeper").join("cards.db");

    let db = Database::new(DatabaseConfig::new(path.to_string_lossy()))
        .await
        .unwrap();
    db.health_check().await.unwrap();
    db.close().await;

    assert!(path.exists());
}

#[tokio::test]
async fn test_missing_file_without_create_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.db");

    let result = Database::new(DatabaseConfig::new(path.to_string_lossy()).create_if_missing(false))
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_cards_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cards.db");
    let config = DatabaseConfig::new(path.to_string_lossy());

    let id = {
        let db = Database::new(config.clone()).await.unwrap();
        let store = CardStore::sqlite(&db, StoreConfig::default());

        let saved = store
            .save(
                &BusinessCard::builder("Jane Doe")
                    .company("Acme")
                    .phone("555-1111")
                    .additional_email("jane@home.example")
                    .build(),
            )
            .await;
        let id = saved.card().and_then(|c| c.id.clone()).unwrap();
        db.close().await;
        id
    };

    let db = Database::new(config).await.unwrap();
    let store = CardStore::sqlite(&db, StoreConfig::default());

    let cards = store.get_all().await;
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].id.as_deref(), Some(id.as_str()));
    assert_eq!(cards[0].company, "Acme");
    assert_eq!(cards[0].additional_emails, vec!["jane@home.example"]);

    db.close().await;
}

#[tokio::test]
async fn test_blob_is_camel_case_json_array() {
    let db = Database::in_memory().await.unwrap();
    let store = CardStore::sqlite(&db, StoreConfig::default());

    store
        .save(&BusinessCard::builder("Jane Doe").title("Engineer").build())
        .await;

    let kv = SqliteKeyValueStore::new(db.pool().clone());
    let raw = kv.get_item("businessCards").await.unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

    let entry = &value.as_array().unwrap()[0];
    assert_eq!(entry["name"], "Jane Doe");
    assert_eq!(entry["title"], "Engineer");
    assert!(entry["createdAt"].is_i64());
    assert!(entry["updatedAt"].is_i64());
}

#[tokio::test]
async fn test_clear_all_removes_slot() {
    let db = Database::in_memory().await.unwrap();
    let store = CardStore::sqlite(&db, StoreConfig::default());

    store.save(&BusinessCard::new("Jane Doe")).await;
    assert!(store.clear_all().await);

    let kv = SqliteKeyValueStore::new(db.pool().clone());
    assert_eq!(kv.get_item("businessCards").await.unwrap(), None);
    assert!(store.get_all().await.is_empty());
}

#[tokio::test]
async fn test_closed_pool_degrades_to_safe_defaults() {
    let db = Database::in_memory().await.unwrap();
    let store = CardStore::sqlite(&db, StoreConfig::default());
    db.close().await;

    assert!(store.get_all().await.is_empty());
    assert!(!store.save(&BusinessCard::new("Jane Doe")).await.is_saved());
    assert!(!store.clear_all().await);
}
