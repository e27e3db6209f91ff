//! Item identifier helpers.
//!
//! An item id is the display name followed by [`ITEM_ID_SEPARATOR`] and a UUID v4,
//! e.g. `Norway-5f0c1e8a-9c2d-4a51-8d0e-8f3b1c2d4e5f`. Identical names never collide
//! because the token is fresh for every item.

use uuid::Uuid;

/// Separator between the display name and the uniqueness token.
pub const ITEM_ID_SEPARATOR: char = '-';

/// Generate a fresh item id for the given display name.
///
/// # Example
///
/// ```
/// use vote_ledger_shared::{display_name, generate_item_id};
///
/// let id = generate_item_id("Norway");
/// assert!(id.starts_with("Norway-"));
/// assert_eq!(display_name(&id), "Norway");
/// ```
pub fn generate_item_id(name: &str) -> String {
    format!("{}{}{}", name, ITEM_ID_SEPARATOR, Uuid::new_v4())
}

/// Derive the display name from an item id.
///
/// The name is everything before the first separator. An id without a separator
/// is returned unchanged.
pub fn display_name(item_id: &str) -> &str {
    item_id
        .split_once(ITEM_ID_SEPARATOR)
        .map(|(name, _)| name)
        .unwrap_or(item_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_item_id_is_unique_for_same_name() {
        let first = generate_item_id("Thailand");
        let second = generate_item_id("Thailand");

        assert_ne!(first, second);
        assert_eq!(display_name(&first), "Thailand");
        assert_eq!(display_name(&second), "Thailand");
    }

    #[test]
    fn test_generate_item_id_token_is_uuid() {
        let id = generate_item_id("Norway");
        let token = id.strip_prefix("Norway-").unwrap();

        assert!(Uuid::parse_str(token).is_ok());
    }

    #[test]
    fn test_display_name_with_spaces() {
        assert_eq!(
            display_name("Trinidad and Tobago-90b11fe6-a8f6-4610-bf98-679aaf919c36"),
            "Trinidad and Tobago"
        );
    }

    #[test]
    fn test_display_name_without_separator() {
        assert_eq!(display_name("mockItemId"), "mockItemId");
    }

    #[test]
    fn test_display_name_takes_first_segment() {
        assert_eq!(display_name("existingBangladesh-MockUUID"), "existingBangladesh");
    }
}
