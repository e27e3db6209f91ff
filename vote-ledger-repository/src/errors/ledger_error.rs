//! Ledger error types.

use thiserror::Error;

use super::StoreError;

/// Errors returned by ledger operations.
///
/// `ItemNotFound` and `DeletionNotAllowed` are domain failures raised before any
/// write of the failing operation. `Infrastructure` carries store failures unchanged.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LedgerError {
    /// The referenced item is not in the catalog.
    #[error("Vote item not found: {0}")]
    ItemNotFound(String),

    /// The delete guard rejected the item (no tally entry).
    #[error("Deletion not allowed for vote item: {0}")]
    DeletionNotAllowed(String),

    /// The store was unreachable or a batch failed.
    #[error("Infrastructure failure: {0}")]
    Infrastructure(#[from] StoreError),
}

impl LedgerError {
    /// Create an item not found error.
    pub fn item_not_found(item_id: impl Into<String>) -> Self {
        Self::ItemNotFound(item_id.into())
    }

    /// Create a deletion not allowed error.
    pub fn deletion_not_allowed(item_id: impl Into<String>) -> Self {
        Self::DeletionNotAllowed(item_id.into())
    }

    /// Whether this is a domain failure rather than an infrastructure one.
    pub fn is_domain(&self) -> bool {
        !matches!(self, Self::Infrastructure(_))
    }
}
