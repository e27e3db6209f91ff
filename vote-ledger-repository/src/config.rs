//! Configuration types for the VoteLedgerService.

/// Default key of the item catalog hash.
pub const DEFAULT_CATALOG_KEY: &str = "vote_item";

/// Default key of the tally sorted set.
pub const DEFAULT_TALLY_KEY: &str = "vote_counts";

/// Default key of the voter assignment hash.
pub const DEFAULT_ASSIGNMENTS_KEY: &str = "voted_users";

/// Default prefix of the per-item membership sets.
pub const DEFAULT_MEMBERSHIP_PREFIX: &str = "item_voted_by:";

/// Store key names used by the ledger.
///
/// Item ids are dynamic, so membership sets are addressed by prefix rather than by
/// a fixed key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerKeys {
    pub catalog: String,
    pub tally: String,
    pub assignments: String,
    pub membership_prefix: String,
}

impl Default for LedgerKeys {
    fn default() -> Self {
        Self {
            catalog: DEFAULT_CATALOG_KEY.to_string(),
            tally: DEFAULT_TALLY_KEY.to_string(),
            assignments: DEFAULT_ASSIGNMENTS_KEY.to_string(),
            membership_prefix: DEFAULT_MEMBERSHIP_PREFIX.to_string(),
        }
    }
}

impl LedgerKeys {
    /// Default key names prefixed with `{namespace}:`.
    ///
    /// Lets several ledgers share one store without seeing each other's data.
    ///
    /// # Example
    ///
    /// ```
    /// use vote_ledger_repository::LedgerKeys;
    ///
    /// let keys = LedgerKeys::namespaced("poll42");
    /// assert_eq!(keys.catalog, "poll42:vote_item");
    /// assert_eq!(keys.membership_key("Norway-1"), "poll42:item_voted_by:Norway-1");
    /// ```
    pub fn namespaced(namespace: &str) -> Self {
        Self {
            catalog: format!("{}:{}", namespace, DEFAULT_CATALOG_KEY),
            tally: format!("{}:{}", namespace, DEFAULT_TALLY_KEY),
            assignments: format!("{}:{}", namespace, DEFAULT_ASSIGNMENTS_KEY),
            membership_prefix: format!("{}:{}", namespace, DEFAULT_MEMBERSHIP_PREFIX),
        }
    }

    /// Key of the membership set for one item.
    pub fn membership_key(&self, item_id: &str) -> String {
        format!("{}{}", self.membership_prefix, item_id)
    }

    /// Scan pattern matching every membership set.
    pub fn membership_pattern(&self) -> String {
        format!("{}*", self.membership_prefix)
    }
}

/// Configuration for the VoteLedgerService.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Store key names.
    pub keys: LedgerKeys,

    /// `COUNT` hint passed to each scan step during a reset.
    ///
    /// Defaults to 100.
    pub scan_count: usize,

    /// Maximum number of membership keys removed per delete call during a reset.
    ///
    /// Defaults to 500.
    pub delete_batch_size: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            keys: LedgerKeys::default(),
            scan_count: 100,
            delete_batch_size: 500,
        }
    }
}

impl LedgerConfig {
    /// Create a config with custom key names and default tuning.
    pub fn with_keys(keys: LedgerKeys) -> Self {
        Self {
            keys,
            ..Self::default()
        }
    }

    /// Override the scan `COUNT` hint. Zero is bumped to one.
    pub fn scan_count(mut self, scan_count: usize) -> Self {
        self.scan_count = scan_count.max(1);
        self
    }

    /// Override the delete chunk size. Zero is bumped to one.
    pub fn delete_batch_size(mut self, delete_batch_size: usize) -> Self {
        self.delete_batch_size = delete_batch_size.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_keys() {
        let keys = LedgerKeys::default();

        assert_eq!(keys.catalog, "vote_item");
        assert_eq!(keys.tally, "vote_counts");
        assert_eq!(keys.assignments, "voted_users");
        assert_eq!(keys.membership_key("voteid123"), "item_voted_by:voteid123");
        assert_eq!(keys.membership_pattern(), "item_voted_by:*");
    }

    #[test]
    fn test_namespaced_pattern() {
        let keys = LedgerKeys::namespaced("test");

        assert_eq!(keys.tally, "test:vote_counts");
        assert_eq!(keys.membership_pattern(), "test:item_voted_by:*");
    }

    #[test]
    fn test_tuning_never_zero() {
        let config = LedgerConfig::default().scan_count(0).delete_batch_size(0);

        assert_eq!(config.scan_count, 1);
        assert_eq!(config.delete_batch_size, 1);
    }
}
