//! In-memory implementation of the key-value store.
//!
//! Used by tests and by local runs started with `LEDGER_STORE=memory`.

mod glob;
mod store;

pub use store::InMemoryStore;
