//! Route modules.

pub mod export;
pub mod generate;
pub mod health;

use serde::de::DeserializeOwned;
use storybook_core::error::DomainError;

/// Decodes a JSON request body. Malformed JSON and schema mismatches are
/// validation errors (400), not axum's default 422 rejection.
pub(crate) fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, DomainError> {
    serde_json::from_slice(body)
        .map_err(|e| DomainError::validation(format!("invalid request body: {e}")))
}
