//! # Vote Ledger Repository
//!
//! This crate provides the store abstraction the vote ledger runs on, a Redis and an
//! in-memory implementation of it, and `VoteLedgerService`, which keeps the item
//! catalog, tally, voter assignments and membership sets consistent using the
//! store's atomic batches.

pub mod config;
pub mod errors;
pub mod interfaces;
mod ledger;
pub mod memory;
pub mod redis_store;
pub mod service;
pub mod types;

pub use config::{LedgerConfig, LedgerKeys};
pub use errors::{LedgerError, StoreError};
pub use interfaces::KeyValueStore;
pub use memory::InMemoryStore;
pub use redis_store::{RedisStore, RedisStoreConfig};
pub use service::VoteLedgerService;
pub use types::{AtomicBatch, BatchOpResult, BatchSummary, StoreOp};
