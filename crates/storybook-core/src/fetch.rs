//! Image byte sources consulted while assembling a document.

use async_trait::async_trait;
use thiserror::Error;

/// Failure to obtain image bytes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The server answered with a non-success status.
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// The request could not be sent or the body could not be read.
    #[error("transport error: {0}")]
    Transport(String),

    /// A local file could not be read.
    #[error("io error: {0}")]
    Io(String),

    /// Local file references are not permitted in this deployment.
    #[error("local image paths are disabled")]
    LocalPathsDisabled,
}

/// Reads the raw bytes behind a remote URL or a local path.
///
/// Implementations perform a single attempt with no retry.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Fetches the body of an `http`/`https` URL.
    async fn fetch_remote(&self, url: &str) -> Result<Vec<u8>, FetchError>;

    /// Reads a file from the local filesystem.
    async fn read_local(&self, path: &str) -> Result<Vec<u8>, FetchError>;
}
