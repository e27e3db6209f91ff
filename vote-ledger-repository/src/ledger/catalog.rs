//! Item catalog: `itemId -> description` hash.

use std::collections::HashMap;

use crate::errors::StoreError;
use crate::interfaces::KeyValueStore;
use crate::types::AtomicBatch;

pub(crate) struct Catalog<'a> {
    store: &'a dyn KeyValueStore,
    key: &'a str,
}

impl<'a> Catalog<'a> {
    pub(crate) fn new(store: &'a dyn KeyValueStore, key: &'a str) -> Self {
        Self { store, key }
    }

    pub(crate) async fn exists(&self, item_id: &str) -> Result<bool, StoreError> {
        self.store.hash_exists(self.key, item_id).await
    }

    /// Every item with its description.
    pub(crate) async fn descriptions(&self) -> Result<HashMap<String, String>, StoreError> {
        self.store.hash_get_all(self.key).await
    }

    pub(crate) async fn set_description(
        &self,
        item_id: &str,
        description: &str,
    ) -> Result<(), StoreError> {
        self.store.hash_set(self.key, item_id, description).await
    }

    /// Remove an item row. Returns whether a row was removed.
    pub(crate) async fn remove(&self, item_id: &str) -> Result<bool, StoreError> {
        Ok(self.store.hash_delete(self.key, item_id).await? > 0)
    }

    pub(crate) fn queue_insert(&self, batch: &mut AtomicBatch, item_id: &str, description: &str) {
        batch.hash_set(self.key, item_id, description);
    }

    pub(crate) fn queue_clear(&self, batch: &mut AtomicBatch) {
        batch.delete(self.key);
    }
}
