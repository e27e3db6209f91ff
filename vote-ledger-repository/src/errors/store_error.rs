//! Store error types.
//!
//! This module defines the unified error type for all key-value store operations,
//! independent of which backend produced it.

use thiserror::Error;

/// Unified errors from key-value store operations.
///
/// Used by the `KeyValueStore` trait for every primitive. Ledger operations wrap it
/// in `LedgerError::Infrastructure` and never retry.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    /// Failed to establish or keep a connection to the store.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The store rejected or failed a single command.
    #[error("Command error: {0}")]
    CommandError(String),

    /// An atomic batch was aborted or could not be executed.
    #[error("Transaction error: {0}")]
    TransactionError(String),

    /// A reply could not be converted into the expected type.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Unknown error.
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl StoreError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a command error.
    pub fn command(msg: impl Into<String>) -> Self {
        Self::CommandError(msg.into())
    }

    /// Create a transaction error.
    pub fn transaction(msg: impl Into<String>) -> Self {
        Self::TransactionError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create an unknown error.
    pub fn unknown(msg: impl Into<String>) -> Self {
        Self::Unknown(msg.into())
    }
}
