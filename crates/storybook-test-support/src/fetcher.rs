//! Test image fetcher — canned responses keyed by URL or path.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use storybook_core::fetch::{FetchError, ImageFetcher};

/// An image fetcher that answers from a fixed table and records every key it
/// was asked for, in order. Unknown keys fail with a transport error, the
/// same outcome as an unreachable host.
#[derive(Debug, Default)]
pub struct StaticImageFetcher {
    responses: HashMap<String, Result<Vec<u8>, FetchError>>,
    requests: Mutex<Vec<String>>,
}

impl StaticImageFetcher {
    /// Registers the result returned for `key` (a URL or a local path).
    #[must_use]
    pub fn with_response(
        mut self,
        key: impl Into<String>,
        response: Result<Vec<u8>, FetchError>,
    ) -> Self {
        self.responses.insert(key.into(), response);
        self
    }

    /// Returns a snapshot of every requested key.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn answer(&self, key: &str) -> Result<Vec<u8>, FetchError> {
        self.requests.lock().unwrap().push(key.to_owned());
        self.responses.get(key).cloned().unwrap_or_else(|| {
            Err(FetchError::Transport(format!(
                "no response configured for {key}"
            )))
        })
    }
}

#[async_trait]
impl ImageFetcher for StaticImageFetcher {
    async fn fetch_remote(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.answer(url)
    }

    async fn read_local(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        self.answer(path)
    }
}
