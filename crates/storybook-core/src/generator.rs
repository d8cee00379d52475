//! Generation collaborator abstractions.
//!
//! Vendor clients implement these traits in `storybook-generation`; tests
//! substitute fakes from `storybook-test-support`.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::request::StoryRequest;
use crate::story::Story;

/// Image-generation backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ImageModel {
    /// OpenAI DALL·E 3.
    #[default]
    #[serde(rename = "openai-dalle3")]
    OpenAiDalle3,
    /// Google Gemini image model.
    #[serde(rename = "google-nano-banana")]
    GoogleNanoBanana,
}

impl ImageModel {
    /// Wire identifier of this backend.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenAiDalle3 => "openai-dalle3",
            Self::GoogleNanoBanana => "google-nano-banana",
        }
    }
}

impl fmt::Display for ImageModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageModel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openai-dalle3" => Ok(Self::OpenAiDalle3),
            "google-nano-banana" => Ok(Self::GoogleNanoBanana),
            other => Err(DomainError::validation(format!(
                "unknown image model: {other}"
            ))),
        }
    }
}

/// Produces a story from the parent's form input.
#[async_trait]
pub trait StoryGenerator: Send + Sync {
    /// Generates a complete, validated story.
    async fn generate(&self, request: &StoryRequest) -> Result<Story, DomainError>;
}

/// Produces one illustration reference from a text prompt.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// The backend this generator talks to.
    fn model(&self) -> ImageModel;

    /// Generates an illustration and returns its URL or data URI.
    async fn generate_image(&self, prompt: &str) -> Result<String, DomainError>;
}
