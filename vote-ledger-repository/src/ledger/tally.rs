//! Tally index: `itemId -> score` sorted set.

use crate::errors::StoreError;
use crate::interfaces::KeyValueStore;
use crate::types::AtomicBatch;

pub(crate) struct Tally<'a> {
    store: &'a dyn KeyValueStore,
    key: &'a str,
}

impl<'a> Tally<'a> {
    pub(crate) fn new(store: &'a dyn KeyValueStore, key: &'a str) -> Self {
        Self { store, key }
    }

    /// Current score of an item, `None` when it has no tally entry.
    pub(crate) async fn score(&self, item_id: &str) -> Result<Option<i64>, StoreError> {
        Ok(self
            .store
            .sorted_set_score(self.key, item_id)
            .await?
            .map(|score| score as i64))
    }

    /// Every tally entry, highest score first.
    pub(crate) async fn ranked(&self) -> Result<Vec<(String, i64)>, StoreError> {
        Ok(self
            .store
            .sorted_set_range_desc_with_scores(self.key)
            .await?
            .into_iter()
            .map(|(item_id, score)| (item_id, score as i64))
            .collect())
    }

    /// Queue a fresh entry at zero.
    pub(crate) fn queue_init(&self, batch: &mut AtomicBatch, item_id: &str) {
        batch.sorted_set_add(self.key, item_id, 0.0);
    }

    pub(crate) fn queue_increment(&self, batch: &mut AtomicBatch, item_id: &str) {
        batch.sorted_set_increment(self.key, item_id, 1.0);
    }

    pub(crate) fn queue_decrement(&self, batch: &mut AtomicBatch, item_id: &str) {
        batch.sorted_set_increment(self.key, item_id, -1.0);
    }

    pub(crate) fn queue_clear(&self, batch: &mut AtomicBatch) {
        batch.delete(self.key);
    }
}
