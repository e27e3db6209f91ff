//! Membership index: one set of voter ids per item.

use crate::config::LedgerKeys;
use crate::types::AtomicBatch;

pub(crate) struct Membership<'a> {
    keys: &'a LedgerKeys,
}

impl<'a> Membership<'a> {
    pub(crate) fn new(keys: &'a LedgerKeys) -> Self {
        Self { keys }
    }

    pub(crate) fn queue_join(&self, batch: &mut AtomicBatch, item_id: &str, user_id: &str) {
        batch.set_add(self.keys.membership_key(item_id), user_id);
    }

    pub(crate) fn queue_leave(&self, batch: &mut AtomicBatch, item_id: &str, user_id: &str) {
        batch.set_remove(self.keys.membership_key(item_id), user_id);
    }

    /// Scan pattern covering every membership set.
    pub(crate) fn pattern(&self) -> String {
        self.keys.membership_pattern()
    }
}
