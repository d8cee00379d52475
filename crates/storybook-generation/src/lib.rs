//! Story and illustration generators for the Storybook service.
//!
//! Vendor clients (`OpenAI`, Google Gemini) and the offline story mock
//! implement the collaborator traits from `storybook_core::generator`, so the
//! API crate can swap them by configuration. Mock illustrations are plain SVG
//! data URIs and need no backend.

pub mod gemini;
mod http;
pub mod illustrate;
pub mod mock;
pub mod openai;
pub mod prompts;
mod svg;

pub use gemini::GeminiImageGenerator;
pub use illustrate::{FAILED_IMAGE_PLACEHOLDER_TEXT, illustrate_story};
pub use mock::{MockStoryGenerator, fallback_story, mock_card, mock_illustrations};
pub use openai::{OpenAiImageGenerator, OpenAiStoryGenerator};
