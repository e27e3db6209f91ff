//! Key-value store trait definition.
//!
//! This module defines the capability set the ledger needs from a shared store:
//! hashes, sorted sets, sets, atomic batches and cursor-based key enumeration.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::errors::StoreError;
use crate::types::{AtomicBatch, BatchSummary};

/// Abstracts the underlying key-value store (Redis, in-memory, ...).
///
/// Implementations are pure pass-through: no business logic, no retries. They are
/// injected into `VoteLedgerService` as `Arc<dyn KeyValueStore>` and shared by every
/// in-flight operation, so they must be safe for concurrent use.
///
/// Every primitive is individually atomic. `execute_atomic` applies a whole batch
/// atomically but offers no isolation against reads made outside the batch.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Read one field of a hash.
    async fn hash_get(&self, key: &str, field: &str) -> Result<Option<String>, StoreError>;

    /// Write one field of a hash.
    async fn hash_set(&self, key: &str, field: &str, value: &str) -> Result<(), StoreError>;

    /// Read every field of a hash. A missing key yields an empty map.
    async fn hash_get_all(&self, key: &str) -> Result<HashMap<String, String>, StoreError>;

    /// Remove one field of a hash.
    ///
    /// # Returns
    ///
    /// * `Ok(n)` - Number of fields actually removed (0 or 1)
    async fn hash_delete(&self, key: &str, field: &str) -> Result<u64, StoreError>;

    /// Whether a hash field exists.
    async fn hash_exists(&self, key: &str, field: &str) -> Result<bool, StoreError>;

    /// Number of fields in a hash.
    async fn hash_len(&self, key: &str) -> Result<u64, StoreError>;

    /// Increment a sorted-set member's score, returning the new score.
    async fn sorted_set_increment(
        &self,
        key: &str,
        member: &str,
        delta: f64,
    ) -> Result<f64, StoreError>;

    /// Score of a sorted-set member, `None` when the member is absent.
    async fn sorted_set_score(&self, key: &str, member: &str) -> Result<Option<f64>, StoreError>;

    /// Every member of a sorted set with its score, highest score first.
    async fn sorted_set_range_desc_with_scores(
        &self,
        key: &str,
    ) -> Result<Vec<(String, f64)>, StoreError>;

    /// Add a member to a set. Returns whether it was newly added.
    async fn set_add(&self, key: &str, member: &str) -> Result<bool, StoreError>;

    /// Remove a member from a set. Returns whether it was present.
    async fn set_remove(&self, key: &str, member: &str) -> Result<bool, StoreError>;

    /// Apply every operation of `batch` atomically.
    ///
    /// # Returns
    ///
    /// * `Ok(BatchSummary)` - The batch ran; per-operation outcomes are in the summary
    /// * `Err(StoreError)` - The batch could not be executed at all
    async fn execute_atomic(&self, batch: &AtomicBatch) -> Result<BatchSummary, StoreError>;

    /// One step of a cursor-based key scan.
    ///
    /// Start with cursor `0`; the scan is complete when the returned cursor is `0`.
    /// A key may be reported more than once across steps.
    ///
    /// # Arguments
    ///
    /// * `cursor` - Cursor returned by the previous step, or `0`
    /// * `pattern` - Glob pattern, e.g. `item_voted_by:*`
    /// * `count` - Hint for how many keys to examine per step
    async fn scan_keys(
        &self,
        cursor: u64,
        pattern: &str,
        count: usize,
    ) -> Result<(u64, Vec<String>), StoreError>;

    /// Delete the given keys, returning how many existed.
    async fn delete_keys(&self, keys: &[String]) -> Result<u64, StoreError>;
}
