//! Production `ImageFetcher` backed by `reqwest` and the local filesystem.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use percent_encoding::percent_decode_str;
use reqwest::Client;
use storybook_core::error::DomainError;
use storybook_core::fetch::{FetchError, ImageFetcher};
use tracing::{debug, instrument};

/// Fetches remote images over HTTP(S) and reads local files with `tokio::fs`.
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    /// Builds a fetcher. `timeout` bounds each remote request; `None` waits
    /// indefinitely.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the HTTP client cannot be built.
    pub fn new(timeout: Option<Duration>) -> Result<Self, DomainError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| DomainError::Infrastructure(format!("http client: {e}")))?;
        Ok(Self { client })
    }

    /// Wraps an existing client, sharing its connection pool.
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    #[instrument(skip(self))]
    async fn fetch_remote(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        debug!(bytes = body.len(), "fetched remote image");
        Ok(body.to_vec())
    }

    #[instrument(skip(self))]
    async fn read_local(&self, reference: &str) -> Result<Vec<u8>, FetchError> {
        let path = local_path(reference)?;
        tokio::fs::read(&path)
            .await
            .map_err(|e| FetchError::Io(format!("{}: {e}", path.display())))
    }
}

/// Maps a `file:` URI to the path it names; any other reference is taken as
/// a path already. Only local (empty or `localhost`) authorities are read.
fn local_path(reference: &str) -> Result<PathBuf, FetchError> {
    let Some(rest) = reference.strip_prefix("file:") else {
        return Ok(PathBuf::from(reference));
    };
    let rest = rest
        .strip_prefix("//localhost")
        .or_else(|| rest.strip_prefix("//"))
        .unwrap_or(rest);
    if !rest.starts_with('/') {
        return Err(FetchError::Io(format!("not a local file URI: {reference}")));
    }
    let decoded = percent_decode_str(rest)
        .decode_utf8()
        .map_err(|e| FetchError::Io(format!("{reference}: {e}")))?;
    Ok(PathBuf::from(decoded.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_local_reports_missing_file_as_io_error() {
        let fetcher = HttpImageFetcher::new(None).unwrap();

        let result = fetcher
            .read_local("/definitely/not/here/storybook-page.png")
            .await;

        assert!(matches!(result, Err(FetchError::Io(_))));
    }

    #[test]
    fn test_file_uris_map_to_paths() {
        assert_eq!(
            local_path("file:///tmp/art/page%201.png").unwrap(),
            PathBuf::from("/tmp/art/page 1.png")
        );
        assert_eq!(
            local_path("file://localhost/tmp/a.png").unwrap(),
            PathBuf::from("/tmp/a.png")
        );
        assert_eq!(local_path("art/page1.png").unwrap(), PathBuf::from("art/page1.png"));
        assert!(matches!(
            local_path("file://fileserver/share/a.png"),
            Err(FetchError::Io(_))
        ));
    }

    #[tokio::test]
    async fn test_read_local_follows_file_uri_to_existing_file() {
        // Arrange
        let path = std::env::temp_dir().join(format!("storybook-fetch-{}.bin", std::process::id()));
        tokio::fs::write(&path, b"page art").await.unwrap();
        let fetcher = HttpImageFetcher::new(None).unwrap();

        // Act
        let result = fetcher
            .read_local(&format!("file://{}", path.display()))
            .await;

        // Assert
        tokio::fs::remove_file(&path).await.unwrap();
        assert_eq!(result.unwrap(), b"page art".to_vec());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_a_transport_error() {
        let fetcher = HttpImageFetcher::new(Some(Duration::from_secs(2))).unwrap();

        // Port 9 (discard) on loopback is expected to refuse connections.
        let result = fetcher.fetch_remote("http://127.0.0.1:9/page.png").await;

        assert!(matches!(result, Err(FetchError::Transport(_))));
    }
}
