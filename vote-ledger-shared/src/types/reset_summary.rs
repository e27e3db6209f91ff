//! Outcome of a full ledger reset.

use serde::{Deserialize, Serialize};

/// Message reported when every principal structure was deleted.
pub const RESET_SUCCESS_MESSAGE: &str = "All data was deleted successfully.";

/// Message reported when at least one principal deletion failed.
pub const RESET_PARTIAL_MESSAGE: &str =
    "Some data deletion failed. Check the results for details.";

/// Summary of a ledger reset.
///
/// `all_deleted` only reflects the atomic deletion of the catalog, tally index and
/// voter assignments. Membership-index cleanup is best-effort and only surfaces as
/// the number of keys that were actually removed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResetSummary {
    pub all_deleted: bool,
    pub membership_keys_removed: u64,
}

impl ResetSummary {
    /// Human readable outcome.
    pub fn message(&self) -> &'static str {
        if self.all_deleted {
            RESET_SUCCESS_MESSAGE
        } else {
            RESET_PARTIAL_MESSAGE
        }
    }
}
