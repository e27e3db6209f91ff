//! Redis implementation of the key-value store.
//!
//! This module provides a concrete implementation of `KeyValueStore`
//! backed by a Redis connection manager.

mod config;
mod store;

pub use config::RedisStoreConfig;
pub use store::RedisStore;
