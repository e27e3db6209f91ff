//! Vote ledger service implementation.
//!
//! This module provides the single entry point to the ledger. Application code uses
//! it to cast votes, list rankings, manage the item catalog and reset all state.
//!
//! # Consistency
//!
//! Every multi-structure write goes through one atomic batch of the store. Reads
//! made before a batch (existence checks, the voter's previous assignment) are not
//! isolated from concurrent writers, and the voter assignment is written after the
//! batch commits.

use std::sync::Arc;

use tracing::{info, instrument};
use vote_ledger_shared::{generate_item_id, RankedItem, Ranking, ResetSummary, VoteItem};

use crate::config::LedgerConfig;
use crate::errors::LedgerError;
use crate::interfaces::KeyValueStore;
use crate::ledger::{
    require_committed, Assignments, Catalog, Maintenance, Tally, VotingCoordinator,
};
use crate::types::AtomicBatch;

/// The main service for interacting with the vote ledger.
///
/// This is the high-level API that application code should use. It holds the store
/// handle as `Arc<dyn KeyValueStore>` and shares it with every in-flight operation;
/// there is no in-process locking.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use vote_ledger_repository::{InMemoryStore, VoteLedgerService};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let service = VoteLedgerService::new(Arc::new(InMemoryStore::new()));
///
/// let item_id = service.add_item("Norway", "Fjords").await?;
/// service.cast_or_switch_vote(&item_id, "alice").await?;
///
/// let ranking = service.list_ranked().await?;
/// assert_eq!(ranking.total_vote, 1);
/// assert_eq!(ranking.items[0].name, "Norway");
/// # Ok(())
/// # }
/// ```
pub struct VoteLedgerService {
    store: Arc<dyn KeyValueStore>,
    config: LedgerConfig,
}

impl VoteLedgerService {
    /// Create a new VoteLedgerService with default configuration.
    ///
    /// # Arguments
    ///
    /// * `store` - Shared store handle (e.g., `RedisStore`, `InMemoryStore`)
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            config: LedgerConfig::default(),
        }
    }

    /// Create a new VoteLedgerService with custom configuration.
    ///
    /// Use this to namespace the store keys or tune the reset sweep.
    ///
    /// # Arguments
    ///
    /// * `store` - Shared store handle
    /// * `config` - Key names and reset tuning
    pub fn with_config(store: Arc<dyn KeyValueStore>, config: LedgerConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    fn catalog(&self) -> Catalog<'_> {
        Catalog::new(self.store.as_ref(), &self.config.keys.catalog)
    }

    fn tally(&self) -> Tally<'_> {
        Tally::new(self.store.as_ref(), &self.config.keys.tally)
    }

    fn assignments(&self) -> Assignments<'_> {
        Assignments::new(self.store.as_ref(), &self.config.keys.assignments)
    }

    /// Check that the store is reachable.
    pub async fn ping(&self) -> Result<(), LedgerError> {
        Ok(self.store.ping().await?)
    }

    /// Cast a user's vote, or move it to another item.
    ///
    /// The item must exist. The membership sets and tally entries are updated in one
    /// atomic batch; the user's assignment is written once the batch has committed.
    ///
    /// # Arguments
    ///
    /// * `item_id` - The item to vote for
    /// * `user_id` - The voter
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the vote was recorded
    /// * `Err(LedgerError::ItemNotFound)` - If the item is not in the catalog; nothing is written
    /// * `Err(LedgerError::Infrastructure)` - If the store failed or the batch reported a failed
    ///   operation; the assignment is not written
    #[instrument(skip(self))]
    pub async fn cast_or_switch_vote(&self, item_id: &str, user_id: &str) -> Result<(), LedgerError> {
        VotingCoordinator::new(self.store.as_ref(), &self.config.keys)
            .cast_or_switch(item_id, user_id)
            .await
    }

    /// List every item ordered by descending vote count.
    ///
    /// The tally, the catalog and the voter count are read concurrently. Tally
    /// entries without a catalog row are left out.
    ///
    /// # Returns
    ///
    /// * `Ok(Ranking)` - The ranked items and the number of users holding a vote
    /// * `Err(LedgerError::Infrastructure)` - If any of the reads failed
    #[instrument(skip(self))]
    pub async fn list_ranked(&self) -> Result<Ranking, LedgerError> {
        let tally = self.tally();
        let catalog = self.catalog();
        let assignments = self.assignments();

        let (ranked, descriptions, total_vote) = tokio::try_join!(
            tally.ranked(),
            catalog.descriptions(),
            assignments.voter_count()
        )?;

        let items = ranked
            .into_iter()
            .filter_map(|(item_id, votes)| {
                descriptions
                    .get(&item_id)
                    .map(|description| RankedItem::new(item_id.clone(), description.clone(), votes))
            })
            .collect();

        Ok(Ranking { total_vote, items })
    }

    /// Add an item to the catalog with a tally entry of zero.
    ///
    /// # Arguments
    ///
    /// * `name` - Display name; the item id is `{name}-{uuid}`
    /// * `description` - Item description
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The generated item id
    /// * `Err(LedgerError::Infrastructure)` - If the batch could not be committed
    #[instrument(skip(self, description))]
    pub async fn add_item(&self, name: &str, description: &str) -> Result<String, LedgerError> {
        let item_id = generate_item_id(name);

        let mut batch = AtomicBatch::new();
        self.catalog().queue_insert(&mut batch, &item_id, description);
        self.tally().queue_init(&mut batch, &item_id);
        require_committed(self.store.execute_atomic(&batch).await?)?;

        info!(item_id = %item_id, "Vote item added");
        Ok(item_id)
    }

    /// Replace the description of an existing item.
    ///
    /// Nothing is written when the item does not exist, but the returned item is
    /// built from the arguments either way. The tally is never touched.
    ///
    /// # Arguments
    ///
    /// * `item_id` - The full item id (not the display name)
    /// * `description` - New description
    #[instrument(skip(self, description))]
    pub async fn edit_item(&self, item_id: &str, description: &str) -> Result<VoteItem, LedgerError> {
        let catalog = self.catalog();
        if catalog.exists(item_id).await? {
            catalog.set_description(item_id, description).await?;
        }
        Ok(VoteItem::new(item_id, description))
    }

    /// Remove an item from the catalog.
    ///
    /// Allowed only while the item has a tally entry, whatever its score. The tally
    /// entry and the membership set are left in place.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the catalog row was removed
    /// * `Err(LedgerError::DeletionNotAllowed)` - If the item has no tally entry
    /// * `Err(LedgerError::ItemNotFound)` - If the guard passed but there was no catalog row
    #[instrument(skip(self))]
    pub async fn delete_item(&self, item_id: &str) -> Result<(), LedgerError> {
        if self.tally().score(item_id).await?.is_none() {
            return Err(LedgerError::deletion_not_allowed(item_id));
        }

        if !self.catalog().remove(item_id).await? {
            return Err(LedgerError::item_not_found(item_id));
        }

        info!("Vote item deleted");
        Ok(())
    }

    /// Delete every piece of ledger state.
    ///
    /// The catalog, tally and assignments go in one atomic batch. Membership sets are
    /// then found with a cursor scan and deleted in chunks; failures there are only
    /// logged.
    ///
    /// # Returns
    ///
    /// * `Ok(ResetSummary)` - `all_deleted` is false when a principal deletion failed
    /// * `Err(LedgerError::Infrastructure)` - If the principal batch could not run at all
    #[instrument(skip(self))]
    pub async fn reset_all(&self) -> Result<ResetSummary, LedgerError> {
        Maintenance::new(self.store.as_ref(), &self.config).reset().await
    }
}
