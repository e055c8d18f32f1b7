//! End-to-end cart flows against in-memory storage.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;

use go_marketplace_cart::{
    CartContext, CartError, CartStore, DEFAULT_STORAGE_KEY, KeyValueStorage, MemoryStorage,
    payload,
};
use go_marketplace_integration_tests::product;

fn lines(store: &CartStore<impl KeyValueStorage>) -> Vec<(String, u32)> {
    store
        .products()
        .into_iter()
        .map(|item| (item.id.into_inner(), item.quantity.get()))
        .collect()
}

// =============================================================================
// Operation Scenarios
// =============================================================================

#[tokio::test]
async fn test_add_twice_then_decrement_to_empty() {
    let store = CartStore::open(MemoryStorage::new(), DEFAULT_STORAGE_KEY)
        .await
        .unwrap();
    let shirt = product("p1", "Shirt", 10);

    store.add_to_cart(shirt.clone());
    assert_eq!(lines(&store), vec![("p1".to_string(), 1)]);

    store.add_to_cart(shirt);
    assert_eq!(lines(&store), vec![("p1".to_string(), 2)]);

    store.decrement("p1");
    assert_eq!(lines(&store), vec![("p1".to_string(), 1)]);

    store.decrement("p1");
    assert!(store.products().is_empty());
}

#[tokio::test]
async fn test_increment_keeps_insertion_order() {
    let store = CartStore::open(MemoryStorage::new(), DEFAULT_STORAGE_KEY)
        .await
        .unwrap();

    store.add_to_cart(product("p1", "Shirt", 10));
    store.add_to_cart(product("p2", "Hat", 5));
    assert_eq!(
        lines(&store),
        vec![("p1".to_string(), 1), ("p2".to_string(), 1)]
    );

    store.increment("p2");
    assert_eq!(
        lines(&store),
        vec![("p1".to_string(), 1), ("p2".to_string(), 2)]
    );
}

#[tokio::test]
async fn test_distinct_adds_each_have_quantity_one() {
    let store = CartStore::open(MemoryStorage::new(), DEFAULT_STORAGE_KEY)
        .await
        .unwrap();
    let ids: Vec<String> = (0..12).map(|n| format!("sku-{n}")).collect();

    for id in &ids {
        store.add_to_cart(product(id, "Item", 1));
    }

    let products = store.products();
    assert_eq!(products.len(), ids.len());
    assert!(products.iter().all(|item| item.quantity.get() == 1));
    assert!(products.iter().zip(&ids).all(|(item, id)| item.id == id.as_str()));
}

#[tokio::test]
async fn test_first_descriptor_wins() {
    let store = CartStore::open(MemoryStorage::new(), DEFAULT_STORAGE_KEY)
        .await
        .unwrap();

    store.add_to_cart(product("p1", "Shirt", 10));
    store.add_to_cart(product("p1", "Sale Shirt", 7));

    let products = store.products();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].title, "Shirt");
    assert_eq!(products[0].price, product("p1", "Shirt", 10).price);
    assert_eq!(products[0].quantity.get(), 2);
}

// =============================================================================
// Persistence
// =============================================================================

#[tokio::test]
async fn test_storage_matches_memory_after_flush() {
    let storage = Arc::new(MemoryStorage::new());
    let store = CartStore::open(Arc::clone(&storage), DEFAULT_STORAGE_KEY)
        .await
        .unwrap();

    store.add_to_cart(product("p1", "Shirt", 10));
    store.add_to_cart(product("p2", "Hat", 5));
    store.increment("p2");
    store.decrement("p1");
    store.flush().await.unwrap();

    let body = storage.get_item(DEFAULT_STORAGE_KEY).await.unwrap().unwrap();
    assert_eq!(payload::decode(&body).unwrap(), store.snapshot());

    let reopened = CartStore::open(storage, DEFAULT_STORAGE_KEY)
        .await
        .unwrap();
    assert_eq!(reopened.snapshot(), store.snapshot());
}

// =============================================================================
// Context
// =============================================================================

#[tokio::test]
async fn test_context_lifecycle() {
    let context = CartContext::new();
    assert!(matches!(context.cart(), Err(CartError::OutsideContext)));

    context.install(
        CartStore::open(MemoryStorage::new(), DEFAULT_STORAGE_KEY)
            .await
            .unwrap(),
    );
    context.cart().unwrap().add_to_cart(product("p1", "Shirt", 10));
    assert_eq!(context.cart().unwrap().products().len(), 1);

    let store = context.teardown().await.unwrap();
    assert_eq!(store.products().len(), 1);
    assert!(matches!(context.cart(), Err(CartError::OutsideContext)));
}

#[tokio::test]
async fn test_subscriber_follows_mutations() {
    let store = CartStore::open(MemoryStorage::new(), DEFAULT_STORAGE_KEY)
        .await
        .unwrap();
    let mut rx = store.subscribe();

    let writer = store.clone();
    let task = tokio::spawn(async move {
        writer.add_to_cart(product("p1", "Shirt", 10));
        writer.increment("p1");
    });

    task.await.unwrap();
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().total_quantity(), 2);
}
