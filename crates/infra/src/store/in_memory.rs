use std::collections::BTreeMap;
use std::sync::RwLock;

use stockroom_core::ItemId;
use stockroom_inventory::Item;

use super::{ItemStore, StoreError};

/// In-memory item store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryItemStore {
    inner: RwLock<BTreeMap<ItemId, Item>>,
}

impl InMemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing records (later duplicates overwrite).
    pub fn with_items(items: impl IntoIterator<Item = Item>) -> Self {
        let map = items.into_iter().map(|i| (i.id, i)).collect();
        Self {
            inner: RwLock::new(map),
        }
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("in-memory store lock poisoned".to_string())
}

#[async_trait::async_trait]
impl ItemStore for InMemoryItemStore {
    async fn load_all(&self) -> Result<Vec<Item>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.values().cloned().collect())
    }

    async fn get(&self, id: ItemId) -> Result<Option<Item>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.get(&id).cloned())
    }

    async fn find_by_barcode(&self, barcode: &str) -> Result<Vec<Item>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.values().filter(|i| i.barcode == barcode).cloned().collect())
    }

    async fn insert(&self, item: Item) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        if map.contains_key(&item.id) {
            return Err(StoreError::Duplicate(item.id));
        }
        map.insert(item.id, item);
        Ok(())
    }

    async fn update(&self, item: Item) -> Result<bool, StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        match map.get_mut(&item.id) {
            Some(slot) => {
                *slot = item;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: ItemId) -> Result<bool, StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        Ok(map.remove(&id).is_some())
    }
}
