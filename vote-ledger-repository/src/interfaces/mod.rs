//! Interface definitions for the key-value store.
//!
//! This module defines the abstract `KeyValueStore` trait that allows
//! for dependency injection and swappable store implementations.

mod key_value_store;

pub use key_value_store::KeyValueStore;
