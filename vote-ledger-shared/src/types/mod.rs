//! This module defines the core data structures and types used across the vote ledger.
//! It re-exports the catalog, ranking and maintenance types.

pub mod item_id;
pub mod ranking;
pub mod reset_summary;
pub mod vote_item;

pub use ranking::{RankedItem, Ranking};
pub use reset_summary::ResetSummary;
pub use vote_item::VoteItem;
