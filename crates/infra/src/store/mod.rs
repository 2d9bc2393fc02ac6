//! Durable item storage abstraction.
//!
//! The store is the single shared mutable resource behind the directory. It
//! is expected to provide its own internal consistency; callers perform no
//! extra coordination.

pub mod in_memory;
pub mod postgres;

use std::sync::Arc;

use thiserror::Error;

use stockroom_core::ItemId;
use stockroom_inventory::Item;

pub use in_memory::InMemoryItemStore;
pub use postgres::PostgresItemStore;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backend could not be reached or the operation failed.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// An insert collided with an existing id.
    #[error("duplicate item id: {0}")]
    Duplicate(ItemId),

    /// A stored row could not be decoded into an `Item`.
    #[error("corrupt item record: {0}")]
    Corrupt(String),
}

/// Item persistence contract.
///
/// Listing methods return items ordered by id (creation order for UUIDv7 ids).
#[async_trait::async_trait]
pub trait ItemStore: Send + Sync {
    async fn load_all(&self) -> Result<Vec<Item>, StoreError>;

    async fn get(&self, id: ItemId) -> Result<Option<Item>, StoreError>;

    async fn find_by_barcode(&self, barcode: &str) -> Result<Vec<Item>, StoreError>;

    /// Persist a new record. Fails with `Duplicate` if the id exists.
    async fn insert(&self, item: Item) -> Result<(), StoreError>;

    /// Replace the record with the same id. Returns `false` if none existed.
    async fn update(&self, item: Item) -> Result<bool, StoreError>;

    /// Remove the record. Returns `false` if none existed.
    async fn delete(&self, id: ItemId) -> Result<bool, StoreError>;
}

#[async_trait::async_trait]
impl<S> ItemStore for Arc<S>
where
    S: ItemStore + ?Sized,
{
    async fn load_all(&self) -> Result<Vec<Item>, StoreError> {
        (**self).load_all().await
    }

    async fn get(&self, id: ItemId) -> Result<Option<Item>, StoreError> {
        (**self).get(id).await
    }

    async fn find_by_barcode(&self, barcode: &str) -> Result<Vec<Item>, StoreError> {
        (**self).find_by_barcode(barcode).await
    }

    async fn insert(&self, item: Item) -> Result<(), StoreError> {
        (**self).insert(item).await
    }

    async fn update(&self, item: Item) -> Result<bool, StoreError> {
        (**self).update(item).await
    }

    async fn delete(&self, id: ItemId) -> Result<bool, StoreError> {
        (**self).delete(id).await
    }
}
