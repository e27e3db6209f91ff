//! # Vote Ledger
//!
//! Live vote tallying service. Users cast or switch a single vote among a catalog
//! of items and read exact rankings at any time.
//!
//! ## Architecture
//!
//! 1. **Server**: axum router, bearer-token identity, request validation
//! 2. **Service**: `VoteLedgerService` from `vote-ledger-repository`
//! 3. **Store**: Redis (or an in-memory store for local runs)
//!
//! ## Modules
//!
//! - [`config`]: Configuration and dependency initialization
//! - [`server`]: Routes, handlers, extractors and app state
//! - [`errors`]: HTTP error mapping

pub mod config;
pub mod errors;
pub mod server;

pub use config::Dependencies;
pub use errors::ApiError;

use thiserror::Error;
use vote_ledger_repository::StoreError;

/// Errors that can occur during startup or while serving.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The store could not be reached.
    #[error("Store error: {0}")]
    StoreError(#[from] StoreError),

    /// Socket bind or serve failure.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ServerError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
