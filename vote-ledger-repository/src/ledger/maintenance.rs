//! Ledger maintenance: full reset.

use std::collections::BTreeSet;

use tracing::{info, warn};
use vote_ledger_shared::ResetSummary;

use crate::config::LedgerConfig;
use crate::errors::LedgerError;
use crate::interfaces::KeyValueStore;
use crate::ledger::{Assignments, Catalog, Membership, Tally};
use crate::types::AtomicBatch;

pub(crate) struct Maintenance<'a> {
    store: &'a dyn KeyValueStore,
    config: &'a LedgerConfig,
}

impl<'a> Maintenance<'a> {
    pub(crate) fn new(store: &'a dyn KeyValueStore, config: &'a LedgerConfig) -> Self {
        Self { store, config }
    }

    /// Delete the catalog, tally and assignments atomically, then sweep the
    /// membership sets.
    pub(crate) async fn reset(&self) -> Result<ResetSummary, LedgerError> {
        let keys = &self.config.keys;

        let mut batch = AtomicBatch::new();
        Catalog::new(self.store, &keys.catalog).queue_clear(&mut batch);
        Tally::new(self.store, &keys.tally).queue_clear(&mut batch);
        Assignments::new(self.store, &keys.assignments).queue_clear(&mut batch);

        let summary = self.store.execute_atomic(&batch).await?;
        for failed in summary.results.iter().filter(|r| !r.success) {
            warn!(op = %failed.op, error = ?failed.error, "Reset could not delete structure");
        }

        let membership_keys_removed = self.sweep_membership().await;

        info!(
            all_deleted = summary.all_succeeded(),
            membership_keys_removed, "Ledger reset finished"
        );

        Ok(ResetSummary {
            all_deleted: summary.all_succeeded(),
            membership_keys_removed,
        })
    }

    /// Remove every membership set. Failures are logged and skipped.
    async fn sweep_membership(&self) -> u64 {
        let pattern = Membership::new(&self.config.keys).pattern();
        let keys = self.scan_all(&pattern).await;
        if keys.is_empty() {
            return 0;
        }

        let keys: Vec<String> = keys.into_iter().collect();
        let mut removed = 0;
        for chunk in keys.chunks(self.config.delete_batch_size.max(1)) {
            match self.store.delete_keys(chunk).await {
                Ok(n) => removed += n,
                Err(e) => warn!(error = %e, keys = chunk.len(), "Failed to delete membership keys"),
            }
        }
        removed
    }

    /// Walk the key space until the cursor wraps to zero, de-duplicating keys.
    async fn scan_all(&self, pattern: &str) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        let mut cursor = 0;
        loop {
            match self
                .store
                .scan_keys(cursor, pattern, self.config.scan_count)
                .await
            {
                Ok((next, keys)) => {
                    found.extend(keys);
                    cursor = next;
                }
                Err(e) => {
                    warn!(error = %e, cursor, "Membership scan aborted");
                    break;
                }
            }
            if cursor == 0 {
                break;
            }
        }
        found
    }
}
