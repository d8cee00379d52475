//! JSON request plumbing shared by the vendor clients.

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use storybook_core::error::DomainError;
use tracing::{debug, error};

/// Sends `request` and decodes a JSON body. Transport failures, non-success
/// statuses, and undecodable bodies all become `DomainError::Upstream`
/// tagged with `vendor`.
pub(crate) async fn send_json<R: DeserializeOwned>(
    request: RequestBuilder,
    vendor: &str,
) -> Result<R, DomainError> {
    let response = request.send().await.map_err(|e| {
        error!(vendor, error = ?e, "request to generation API failed");
        DomainError::upstream(format!("{vendor} request failed: {e}"))
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        error!(vendor, status = %status, body = %body, "generation API returned error");
        return Err(DomainError::upstream(format!(
            "{vendor} returned {status}: {body}"
        )));
    }

    let decoded = response.json::<R>().await.map_err(|e| {
        error!(vendor, error = ?e, "failed to parse generation API response");
        DomainError::upstream(format!("{vendor} response could not be parsed: {e}"))
    })?;
    debug!(vendor, "generation API responded");
    Ok(decoded)
}
