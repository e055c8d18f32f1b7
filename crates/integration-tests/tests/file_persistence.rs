//! Carts surviving a restart on disk.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use go_marketplace_cart::{CartStore, DEFAULT_STORAGE_KEY, FileStorage, KeyValueStorage};
use go_marketplace_integration_tests::{TempDir, product};

#[tokio::test]
async fn test_cart_survives_restart() {
    let dir = TempDir::new();

    let first = CartStore::open(FileStorage::new(dir.path()), DEFAULT_STORAGE_KEY)
        .await
        .unwrap();
    first.add_to_cart(product("p2", "Hat", 5));
    first.add_to_cart(product("p1", "Shirt", 10));
    first.add_to_cart(product("p1", "Shirt", 10));
    first.shutdown().await.unwrap();
    let expected = first.snapshot();

    let second = CartStore::open(FileStorage::new(dir.path()), DEFAULT_STORAGE_KEY)
        .await
        .unwrap();
    assert_eq!(second.snapshot(), expected);
    assert_eq!(second.products()[0].id, "p2");
}

#[tokio::test]
async fn test_empty_directory_loads_empty_cart() {
    let dir = TempDir::new();
    let store = CartStore::open(FileStorage::new(dir.path()), DEFAULT_STORAGE_KEY)
        .await
        .unwrap();
    assert!(store.products().is_empty());
    assert!(store.is_hydrated());
}

#[tokio::test]
async fn test_payload_is_plain_json_array() {
    let dir = TempDir::new();
    let storage = FileStorage::new(dir.path());

    let store = CartStore::open(storage.clone(), DEFAULT_STORAGE_KEY)
        .await
        .unwrap();
    store.add_to_cart(product("p1", "Shirt", 10));
    store.flush().await.unwrap();

    let body = storage.get_item(DEFAULT_STORAGE_KEY).await.unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        value,
        serde_json::json!([{
            "id": "p1",
            "title": "Shirt",
            "image_url": "https://cdn.example.com/p1.png",
            "price": 10.0,
            "quantity": 1
        }])
    );
}

#[tokio::test]
async fn test_corrupt_file_loads_empty_and_is_overwritten() {
    let dir = TempDir::new();
    let storage = FileStorage::new(dir.path());
    storage
        .set_item(DEFAULT_STORAGE_KEY, "[{\"id\": truncated")
        .await
        .unwrap();

    let store = CartStore::open(storage.clone(), DEFAULT_STORAGE_KEY)
        .await
        .unwrap();
    assert!(store.products().is_empty());

    store.add_to_cart(product("p1", "Shirt", 10));
    store.shutdown().await.unwrap();

    let reopened = CartStore::open(storage, DEFAULT_STORAGE_KEY).await.unwrap();
    assert_eq!(reopened.products().len(), 1);
}

#[tokio::test]
async fn test_separate_keys_are_separate_carts() {
    let dir = TempDir::new();

    let a = CartStore::open(FileStorage::new(dir.path()), "cart:a")
        .await
        .unwrap();
    let b = CartStore::open(FileStorage::new(dir.path()), "cart:b")
        .await
        .unwrap();
    a.add_to_cart(product("p1", "Shirt", 10));
    b.add_to_cart(product("p2", "Hat", 5));
    a.shutdown().await.unwrap();
    b.shutdown().await.unwrap();

    let a = CartStore::open(FileStorage::new(dir.path()), "cart:a")
        .await
        .unwrap();
    assert_eq!(a.products().len(), 1);
    assert_eq!(a.products()[0].id, "p1");
}
