//! Test generators — fake `StoryGenerator` and `ImageGenerator`
//! implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use storybook_core::error::DomainError;
use storybook_core::generator::{ImageGenerator, ImageModel, StoryGenerator};
use storybook_core::request::StoryRequest;
use storybook_core::story::Story;

/// A story generator that always returns an upstream error.
#[derive(Debug)]
pub struct FailingStoryGenerator;

#[async_trait]
impl StoryGenerator for FailingStoryGenerator {
    async fn generate(&self, _request: &StoryRequest) -> Result<Story, DomainError> {
        Err(DomainError::upstream("model unavailable"))
    }
}

/// An image generator that records every prompt and answers with
/// `https://images.test/<model>/<n>.png`, where `n` counts calls from 1.
///
/// Prompts containing the configured marker fail with an upstream error.
#[derive(Debug)]
pub struct RecordingImageGenerator {
    model: ImageModel,
    fail_marker: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl RecordingImageGenerator {
    /// Create a generator that always succeeds.
    #[must_use]
    pub fn new(model: ImageModel) -> Self {
        Self {
            model,
            fail_marker: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Fail every prompt that contains `marker`.
    #[must_use]
    pub fn failing_on(mut self, marker: impl Into<String>) -> Self {
        self.fail_marker = Some(marker.into());
        self
    }

    /// Returns a snapshot of the prompts received, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageGenerator for RecordingImageGenerator {
    fn model(&self) -> ImageModel {
        self.model
    }

    async fn generate_image(&self, prompt: &str) -> Result<String, DomainError> {
        let count = {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(prompt.to_owned());
            prompts.len()
        };
        if self
            .fail_marker
            .as_deref()
            .is_some_and(|marker| prompt.contains(marker))
        {
            return Err(DomainError::upstream("content policy violation"));
        }
        Ok(format!("https://images.test/{}/{count}.png", self.model))
    }
}

/// An image generator that always returns an upstream error.
#[derive(Debug)]
pub struct FailingImageGenerator(pub ImageModel);

#[async_trait]
impl ImageGenerator for FailingImageGenerator {
    fn model(&self) -> ImageModel {
        self.0
    }

    async fn generate_image(&self, _prompt: &str) -> Result<String, DomainError> {
        Err(DomainError::upstream("image backend unavailable"))
    }
}
