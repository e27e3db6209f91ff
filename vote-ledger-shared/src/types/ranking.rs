//! Ranked view of the tally.
//!
//! This module defines the structures returned when listing items ordered by votes.

use serde::{Deserialize, Serialize};

use crate::types::item_id::display_name;

/// A catalog item joined with its current vote count.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RankedItem {
    /// The item's unique identifier.
    pub item_id: String,

    /// Display name derived from the item id.
    pub name: String,

    /// Description from the item catalog.
    pub description: String,

    /// Current score in the tally index.
    pub vote_count: i64,
}

impl RankedItem {
    /// Create a ranked item, deriving the display name from the item id.
    pub fn new(item_id: impl Into<String>, description: impl Into<String>, vote_count: i64) -> Self {
        let item_id = item_id.into();
        let name = display_name(&item_id).to_string();
        Self {
            item_id,
            name,
            description: description.into(),
            vote_count,
        }
    }
}

/// Complete ranking with the number of distinct voters.
///
/// Items are ordered by descending vote count, as returned by the tally index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ranking {
    /// Number of users holding an active vote.
    #[serde(rename = "totalVote")]
    pub total_vote: u64,

    /// Items ordered by descending vote count.
    #[serde(rename = "voteitem")]
    pub items: Vec<RankedItem>,
}

impl Ranking {
    /// Create an empty ranking.
    pub fn empty() -> Self {
        Self {
            total_vote: 0,
            items: Vec::new(),
        }
    }

    /// Total of all vote counts in the ranking.
    pub fn vote_sum(&self) -> i64 {
        self.items.iter().map(|item| item.vote_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranked_item_new() {
        let item = RankedItem::new(
            "Trinidad and Tobago-90b11fe6-a8f6-4610-bf98-679aaf919c36",
            "test 1",
            3,
        );

        assert_eq!(item.name, "Trinidad and Tobago");
        assert_eq!(item.vote_count, 3);
    }

    #[test]
    fn test_ranking_serialization_shape() {
        let ranking = Ranking {
            total_vote: 4,
            items: vec![
                RankedItem::new("Trinidad and Tobago-90b11fe6", "test 1", 3),
                RankedItem::new("Thailand-ed9098c8", "test 2", 1),
            ],
        };

        let json = serde_json::to_value(&ranking).unwrap();

        assert_eq!(json["totalVote"], 4);
        assert_eq!(json["voteitem"][0]["itemId"], "Trinidad and Tobago-90b11fe6");
        assert_eq!(json["voteitem"][0]["name"], "Trinidad and Tobago");
        assert_eq!(json["voteitem"][0]["voteCount"], 3);
        assert_eq!(json["voteitem"][1]["description"], "test 2");
    }

    #[test]
    fn test_empty_ranking() {
        let ranking = Ranking::empty();

        assert_eq!(ranking.total_vote, 0);
        assert!(ranking.items.is_empty());
        assert_eq!(ranking.vote_sum(), 0);
    }
}
