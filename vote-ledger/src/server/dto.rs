//! Request and response bodies.

use serde::{Deserialize, Serialize};

use crate::errors::ApiError;

/// Generic `{message, error?}` envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: None,
        }
    }

    pub fn with_error(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: Some(error.into()),
        }
    }

    pub fn ok() -> Self {
        Self::new("OK")
    }
}

/// Body of `POST /voteitem`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AddVoteItemRequest {
    pub name: String,
    pub description: String,
}

/// Body of `PUT /voteitem`. `name` carries the full item id.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EditVoteItemRequest {
    pub name: String,
    pub description: String,
}

fn require_non_empty(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::validation(format!("{} should not be empty", field)));
    }
    Ok(())
}

impl AddVoteItemRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        require_non_empty("name", &self.name)?;
        require_non_empty("description", &self.description)
    }
}

impl EditVoteItemRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        require_non_empty("name", &self.name)?;
        require_non_empty("description", &self.description)
    }
}
