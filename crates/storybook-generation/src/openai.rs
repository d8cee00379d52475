//! `OpenAI` clients: chat completions for stories, DALL·E 3 for illustrations.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use storybook_core::error::DomainError;
use storybook_core::generator::{ImageGenerator, ImageModel, StoryGenerator};
use storybook_core::request::StoryRequest;
use storybook_core::story::Story;
use tracing::{debug, instrument, warn};

use crate::http::send_json;
use crate::prompts;

/// Default API root.
pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
/// Chat model used for story text.
pub const STORY_MODEL: &str = "gpt-4o-mini";
/// Sampling temperature for story text.
pub const STORY_TEMPERATURE: f32 = 0.8;
/// Image model used for illustrations.
pub const IMAGE_MODEL: &str = "dall-e-3";
/// Requested illustration size.
pub const IMAGE_SIZE: &str = "1024x1024";

const VENDOR: &str = "openai";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    response_format: ResponseFormat,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u8,
    size: &'a str,
    response_format: &'a str,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    #[serde(default)]
    data: Vec<ImageDatum>,
}

#[derive(Debug, Deserialize)]
struct ImageDatum {
    url: Option<String>,
}

/// Writes stories with the chat completions API in JSON mode.
#[derive(Debug, Clone)]
pub struct OpenAiStoryGenerator {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiStoryGenerator {
    /// Creates a generator that shares `client`'s connection pool.
    pub fn new(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: OPENAI_API_BASE.to_owned(),
        }
    }

    /// Points the generator at another API root, such as a proxy.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Parses the model's message content as a story. Missing content is treated
/// as an empty object, which then fails to parse.
fn parse_story(content: Option<&str>) -> Result<Story, DomainError> {
    let content = content.unwrap_or("{}");
    let story: Story = serde_json::from_str(content)
        .map_err(|e| DomainError::upstream(format!("model returned malformed story JSON: {e}")))?;
    story.validate().map_err(|e| {
        warn!(error = %e, "model story failed validation");
        DomainError::upstream(format!("model returned an invalid story: {e}"))
    })?;
    Ok(story)
}

#[async_trait]
impl StoryGenerator for OpenAiStoryGenerator {
    #[instrument(skip_all, fields(model = STORY_MODEL, age = request.age, minutes = request.minutes))]
    async fn generate(&self, request: &StoryRequest) -> Result<Story, DomainError> {
        let body = ChatRequest {
            model: STORY_MODEL,
            temperature: STORY_TEMPERATURE,
            response_format: ResponseFormat {
                kind: "json_object",
            },
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: prompts::system_prompt(request.age, request.minutes),
                },
                ChatMessage {
                    role: "user",
                    content: prompts::user_prompt(request),
                },
            ],
        };

        let response: ChatResponse = send_json(
            self.client
                .post(format!("{}/chat/completions", self.base_url))
                .bearer_auth(&self.api_key)
                .json(&body),
            VENDOR,
        )
        .await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content);
        let story = parse_story(content.as_deref())?;
        debug!(title = %story.title, pages = story.pages.len(), "story generated");
        Ok(story)
    }
}

/// Illustrates pages with DALL·E 3, returning hosted image URLs.
#[derive(Debug, Clone)]
pub struct OpenAiImageGenerator {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiImageGenerator {
    /// Creates a generator that shares `client`'s connection pool.
    pub fn new(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: OPENAI_API_BASE.to_owned(),
        }
    }

    /// Points the generator at another API root.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl ImageGenerator for OpenAiImageGenerator {
    fn model(&self) -> ImageModel {
        ImageModel::OpenAiDalle3
    }

    #[instrument(skip_all, fields(model = IMAGE_MODEL))]
    async fn generate_image(&self, prompt: &str) -> Result<String, DomainError> {
        let body = ImageRequest {
            model: IMAGE_MODEL,
            prompt,
            n: 1,
            size: IMAGE_SIZE,
            response_format: "url",
        };

        let response: ImageResponse = send_json(
            self.client
                .post(format!("{}/images/generations", self.base_url))
                .bearer_auth(&self.api_key)
                .json(&body),
            VENDOR,
        )
        .await?;

        response
            .data
            .into_iter()
            .next()
            .and_then(|datum| datum.url)
            .ok_or_else(|| DomainError::upstream("no image URL returned"))
    }
}
