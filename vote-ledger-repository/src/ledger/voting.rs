//! Voting coordinator: cast or switch a user's single vote.

use tracing::{debug, error};

use crate::config::LedgerKeys;
use crate::errors::LedgerError;
use crate::interfaces::KeyValueStore;
use crate::ledger::{require_committed, Assignments, Catalog, Membership, Tally};
use crate::types::AtomicBatch;

pub(crate) struct VotingCoordinator<'a> {
    store: &'a dyn KeyValueStore,
    keys: &'a LedgerKeys,
}

impl<'a> VotingCoordinator<'a> {
    pub(crate) fn new(store: &'a dyn KeyValueStore, keys: &'a LedgerKeys) -> Self {
        Self { store, keys }
    }

    /// Build the batch that moves `user_id` onto `item_id`.
    ///
    /// With a previous vote the batch leaves the old membership set, joins the new
    /// one, decrements the old tally entry and increments the new one, in that order.
    /// Voting again for the same item runs the same batch and nets out to nothing.
    pub(crate) fn transition(
        &self,
        previous: Option<&str>,
        item_id: &str,
        user_id: &str,
    ) -> AtomicBatch {
        let membership = Membership::new(self.keys);
        let tally = Tally::new(self.store, &self.keys.tally);

        let mut batch = AtomicBatch::new();
        match previous {
            None => {
                membership.queue_join(&mut batch, item_id, user_id);
                tally.queue_increment(&mut batch, item_id);
            }
            Some(previous) => {
                membership.queue_leave(&mut batch, previous, user_id);
                membership.queue_join(&mut batch, item_id, user_id);
                tally.queue_decrement(&mut batch, previous);
                tally.queue_increment(&mut batch, item_id);
            }
        }
        batch
    }

    pub(crate) async fn cast_or_switch(
        &self,
        item_id: &str,
        user_id: &str,
    ) -> Result<(), LedgerError> {
        let catalog = Catalog::new(self.store, &self.keys.catalog);
        if !catalog.exists(item_id).await? {
            return Err(LedgerError::item_not_found(item_id));
        }

        let assignments = Assignments::new(self.store, &self.keys.assignments);
        let previous = assignments.current(user_id).await?;

        let batch = self.transition(previous.as_deref(), item_id, user_id);
        let summary = self.store.execute_atomic(&batch).await?;
        if let Err(e) = require_committed(summary) {
            error!(error = %e, "Vote transition batch reported a failed operation");
            return Err(e);
        }

        assignments.assign(user_id, item_id).await?;

        debug!(previous = ?previous, "Vote recorded");
        Ok(())
    }
}
