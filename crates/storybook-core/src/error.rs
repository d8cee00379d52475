//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Input failed a shape or length constraint.
    #[error("validation error: {0}")]
    Validation(String),

    /// A third-party generation API failed or returned an unusable response.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// An infrastructure error (I/O, client construction).
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl DomainError {
    /// Shorthand for building a `Validation` error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Shorthand for building an `Upstream` error.
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream(message.into())
    }
}
