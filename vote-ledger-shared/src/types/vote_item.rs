//! Catalog item type.

use serde::{Deserialize, Serialize};

use crate::types::item_id::display_name;

/// A votable candidate as stored in the item catalog.
///
/// # Fields
///
/// - `item_id`: Opaque, globally unique identifier (`name` + separator + token)
/// - `name`: Display name derived from `item_id`
/// - `description`: Free-form description text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VoteItem {
    pub item_id: String,
    pub name: String,
    pub description: String,
}

impl VoteItem {
    /// Build an item from its id and description, deriving the display name from the id.
    ///
    /// # Example
    ///
    /// ```
    /// use vote_ledger_shared::VoteItem;
    ///
    /// let item = VoteItem::new("Norway-5f0c1e8a", "Fjords");
    /// assert_eq!(item.name, "Norway");
    /// ```
    pub fn new(item_id: impl Into<String>, description: impl Into<String>) -> Self {
        let item_id = item_id.into();
        let name = display_name(&item_id).to_string();
        Self {
            item_id,
            name,
            description: description.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_item_new() {
        let item = VoteItem::new("Thailand-ed9098c8-7f52-48b3-8717-4726b7090bb9", "test 2");

        assert_eq!(item.item_id, "Thailand-ed9098c8-7f52-48b3-8717-4726b7090bb9");
        assert_eq!(item.name, "Thailand");
        assert_eq!(item.description, "test 2");
    }

    #[test]
    fn test_serialization_uses_camel_case() {
        let item = VoteItem::new("Norway-abc", "desc");

        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["itemId"], "Norway-abc");
        assert_eq!(json["name"], "Norway");
        assert_eq!(json["description"], "desc");
        assert!(json.get("voteCount").is_none());
    }
}
