//! Shared application state.

use std::sync::Arc;

use vote_ledger_repository::VoteLedgerService;

use crate::server::auth::IdentityVerifier;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<VoteLedgerService>,
    pub verifier: Arc<dyn IdentityVerifier>,
}

impl AppState {
    pub fn new(service: Arc<VoteLedgerService>, verifier: Arc<dyn IdentityVerifier>) -> Self {
        Self { service, verifier }
    }
}
