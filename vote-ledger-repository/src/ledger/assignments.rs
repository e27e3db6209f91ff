//! Voter assignment ledger: `userId -> itemId` hash.

use crate::errors::StoreError;
use crate::interfaces::KeyValueStore;
use crate::types::AtomicBatch;

pub(crate) struct Assignments<'a> {
    store: &'a dyn KeyValueStore,
    key: &'a str,
}

impl<'a> Assignments<'a> {
    pub(crate) fn new(store: &'a dyn KeyValueStore, key: &'a str) -> Self {
        Self { store, key }
    }

    /// The item the user currently votes for.
    pub(crate) async fn current(&self, user_id: &str) -> Result<Option<String>, StoreError> {
        self.store.hash_get(self.key, user_id).await
    }

    /// Record the user's vote. Not part of any batch.
    pub(crate) async fn assign(&self, user_id: &str, item_id: &str) -> Result<(), StoreError> {
        self.store.hash_set(self.key, user_id, item_id).await
    }

    /// Number of users holding an active vote.
    pub(crate) async fn voter_count(&self) -> Result<u64, StoreError> {
        self.store.hash_len(self.key).await
    }

    pub(crate) fn queue_clear(&self, batch: &mut AtomicBatch) {
        batch.delete(self.key);
    }
}
