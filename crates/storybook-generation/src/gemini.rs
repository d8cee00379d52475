//! Google Gemini image generation ("nano banana").

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use storybook_core::error::DomainError;
use storybook_core::generator::{ImageGenerator, ImageModel};
use tracing::{debug, instrument};

use crate::http::send_json;

/// Default API root.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Model used when none is configured.
pub const DEFAULT_GEMINI_IMAGE_MODEL: &str = "gemini-2.0-flash-exp";

const VENDOR: &str = "gemini";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: [&'static str; 2],
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    text: Option<String>,
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

/// Illustrates pages with a Gemini image model, returning base64 data URIs.
#[derive(Debug, Clone)]
pub struct GeminiImageGenerator {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiImageGenerator {
    /// Creates a generator for `model` that shares `client`'s connection pool.
    pub fn new(client: Client, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: GEMINI_API_BASE.to_owned(),
        }
    }

    /// Points the generator at another API root.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

fn is_base64(text: &str) -> bool {
    !text.is_empty()
        && text
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'='))
}

/// Picks the illustration out of a response: the first inline image part
/// wins; otherwise a text part holding a data URI or bare base64 is used.
fn extract_image(response: GenerateContentResponse) -> Result<String, DomainError> {
    let parts: Vec<ResponsePart> = response
        .candidates
        .into_iter()
        .filter_map(|candidate| candidate.content)
        .flat_map(|content| content.parts)
        .collect();

    if let Some(inline) = parts.iter().find_map(|part| part.inline_data.as_ref()) {
        return Ok(format!("data:{};base64,{}", inline.mime_type, inline.data));
    }

    let text: String = parts
        .iter()
        .filter_map(|part| part.text.as_deref())
        .collect::<String>()
        .trim()
        .to_owned();
    if text.starts_with("data:") {
        Ok(text)
    } else if is_base64(&text) {
        Ok(format!("data:image/png;base64,{text}"))
    } else {
        Err(DomainError::upstream(
            "invalid image data received from Gemini",
        ))
    }
}

#[async_trait]
impl ImageGenerator for GeminiImageGenerator {
    fn model(&self) -> ImageModel {
        ImageModel::GoogleNanoBanana
    }

    #[instrument(skip_all, fields(model = %self.model))]
    async fn generate_image(&self, prompt: &str) -> Result<String, DomainError> {
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: format!("Generate a children's book illustration: {prompt}"),
                }],
            }],
            generation_config: GenerationConfig {
                response_modalities: ["TEXT", "IMAGE"],
            },
        };

        let response: GenerateContentResponse = send_json(
            self.client
                .post(format!(
                    "{}/models/{}:generateContent",
                    self.base_url, self.model
                ))
                .header("x-goog-api-key", &self.api_key)
                .json(&body),
            VENDOR,
        )
        .await?;

        let image = extract_image(response)?;
        debug!(bytes = image.len(), "gemini image received");
        Ok(image)
    }
}
