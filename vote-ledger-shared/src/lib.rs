//! # Vote Ledger Shared
//!
//! This crate defines shared data structures and types used across the vote ledger.
//! It includes the catalog item, the ranked view returned to callers, and the
//! summary produced by a full ledger reset.

pub mod types;

pub use types::item_id::{display_name, generate_item_id, ITEM_ID_SEPARATOR};
pub use types::ranking::{RankedItem, Ranking};
pub use types::reset_summary::{ResetSummary, RESET_PARTIAL_MESSAGE, RESET_SUCCESS_MESSAGE};
pub use types::vote_item::VoteItem;
