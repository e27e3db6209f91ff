//! Error types for the HTTP API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::{error, warn};
use vote_ledger_repository::LedgerError;

use crate::server::dto::MessageResponse;

/// Message returned for `LedgerError::ItemNotFound`.
pub const ITEM_NOT_FOUND_MESSAGE: &str = "Vote item does not exist.";

/// Message returned for `LedgerError::DeletionNotAllowed`.
pub const DELETION_NOT_ALLOWED_MESSAGE: &str =
    "Vote item can only be deleted while it is tracked in the tally.";

/// The API operation a ledger failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CastVote,
    ListItems,
    AddItem,
    EditItem,
    DeleteItem,
    ClearVotes,
}

impl Operation {
    /// Message returned when the store fails during this operation.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Operation::CastVote => "An error occurred while casting the vote.",
            Operation::ListItems => "An error occurred while fetching vote items.",
            Operation::AddItem => "An error occurred while adding vote items.",
            Operation::EditItem => "An error occurred while edit vote items.",
            Operation::DeleteItem => "An error occurred while delete vote items.",
            Operation::ClearVotes => "An error occurred while clear vote data.",
        }
    }
}

/// Errors returned by HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing, malformed or unknown bearer token.
    #[error("Unauthorized")]
    Unauthorized,

    /// Request body failed validation.
    #[error("{0}")]
    Validation(String),

    /// A ledger operation failed.
    #[error("{operation:?} failed: {source}")]
    Ledger {
        operation: Operation,
        #[source]
        source: LedgerError,
    },

    /// The store did not answer a health check.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl ApiError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Wrap ledger failures of `operation`, for use with `map_err`.
    pub fn ledger(operation: Operation) -> impl FnOnce(LedgerError) -> Self {
        move |source| Self::Ledger { operation, source }
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Ledger { source, .. } if source.is_domain() => StatusCode::BAD_REQUEST,
            ApiError::Ledger { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn body(&self) -> MessageResponse {
        match self {
            ApiError::Unauthorized => MessageResponse::new("Unauthorized"),
            ApiError::Validation(msg) => MessageResponse::new(msg.clone()),
            ApiError::Ledger { operation, source } => match source {
                LedgerError::ItemNotFound(_) => MessageResponse::new(ITEM_NOT_FOUND_MESSAGE),
                LedgerError::DeletionNotAllowed(_) => {
                    MessageResponse::new(DELETION_NOT_ALLOWED_MESSAGE)
                }
                LedgerError::Infrastructure(e) => {
                    MessageResponse::with_error(operation.failure_message(), e.to_string())
                }
            },
            ApiError::Unavailable(e) => MessageResponse::with_error("Store unavailable", e.clone()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, status = status.as_u16(), "Request failed");
        } else if !matches!(self, ApiError::Unauthorized) {
            warn!(error = %self, status = status.as_u16(), "Request rejected");
        }
        (status, Json(self.body())).into_response()
    }
}
