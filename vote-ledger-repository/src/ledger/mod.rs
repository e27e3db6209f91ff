//! Ledger components.
//!
//! Each component owns one store structure and knows its key and encoding. They
//! borrow the store handle and key names from `VoteLedgerService` for the duration
//! of a single operation and hold no state of their own.

mod assignments;
mod catalog;
mod maintenance;
mod membership;
mod tally;
mod voting;

pub(crate) use assignments::Assignments;
pub(crate) use catalog::Catalog;
pub(crate) use maintenance::Maintenance;
pub(crate) use membership::Membership;
pub(crate) use tally::Tally;
pub(crate) use voting::VotingCoordinator;

use crate::errors::LedgerError;
use crate::types::BatchSummary;

/// Turn a batch with any failed operation into an infrastructure error.
pub(crate) fn require_committed(summary: BatchSummary) -> Result<BatchSummary, LedgerError> {
    match summary.first_error() {
        None => Ok(summary),
        Some(err) => Err(LedgerError::Infrastructure(err.clone())),
    }
}
