//! Error types for the vote ledger repository.
//!
//! `StoreError` covers the key-value store itself; `LedgerError` is what the ledger
//! operations return to callers.

mod ledger_error;
mod store_error;

pub use ledger_error::LedgerError;
pub use store_error::StoreError;
