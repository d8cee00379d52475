//! Shared application state.

use std::collections::HashMap;
use std::sync::Arc;

use storybook_core::clock::SystemClock;
use storybook_core::error::DomainError;
use storybook_core::generator::{ImageGenerator, ImageModel, StoryGenerator};
use storybook_generation::{
    GeminiImageGenerator, MockStoryGenerator, OpenAiImageGenerator, OpenAiStoryGenerator,
};
use storybook_pdf::{AssemblerConfig, HttpImageFetcher, StoryAssembler};
use tracing::info;

use crate::config::AppConfig;
use crate::error::AppError;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Writes stories.
    pub story_generator: Arc<dyn StoryGenerator>,
    /// Illustration backends by model.
    pub image_generators: Arc<HashMap<ImageModel, Arc<dyn ImageGenerator>>>,
    /// Backend used when a request names none.
    pub default_image_model: ImageModel,
    /// Serve mock SVG cards instead of calling an image backend.
    pub mock_images: bool,
    /// Serve the fallback story when generation fails.
    pub story_fallback: bool,
    /// Renders stories to PDF.
    pub assembler: Arc<StoryAssembler>,
}

impl AppState {
    /// Create new application state with no image backends, mock images off,
    /// and story fallback on.
    #[must_use]
    pub fn new(story_generator: Arc<dyn StoryGenerator>, assembler: StoryAssembler) -> Self {
        Self {
            story_generator,
            image_generators: Arc::new(HashMap::new()),
            default_image_model: ImageModel::default(),
            mock_images: false,
            story_fallback: true,
            assembler: Arc::new(assembler),
        }
    }

    /// Registers an image backend under its own model.
    #[must_use]
    pub fn with_image_generator(mut self, generator: Arc<dyn ImageGenerator>) -> Self {
        Arc::make_mut(&mut self.image_generators).insert(generator.model(), generator);
        self
    }

    /// Sets the backend used when a request names none.
    #[must_use]
    pub fn with_default_image_model(mut self, model: ImageModel) -> Self {
        self.default_image_model = model;
        self
    }

    /// Turns mock images on or off.
    #[must_use]
    pub fn with_mock_images(mut self, enabled: bool) -> Self {
        self.mock_images = enabled;
        self
    }

    /// Turns the fallback story on or off.
    #[must_use]
    pub fn with_story_fallback(mut self, enabled: bool) -> Self {
        self.story_fallback = enabled;
        self
    }

    /// Wires production collaborators from `config`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when a required API key is missing or the
    /// default image backend is not available.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::new();

        let story_generator: Arc<dyn StoryGenerator> = if config.mock_ai {
            info!("story generation: mock");
            Arc::new(MockStoryGenerator)
        } else {
            let key = config.openai_api_key.as_deref().ok_or_else(|| {
                AppError::Config("OPENAI_API_KEY must be set unless MOCK_AI=true".into())
            })?;
            Arc::new(OpenAiStoryGenerator::new(client.clone(), key))
        };

        // With no fetch timeout the vendor client's pool is reused as is.
        let fetcher = match config.image_fetch_timeout {
            None => HttpImageFetcher::with_client(client.clone()),
            timeout => {
                HttpImageFetcher::new(timeout).map_err(|e| AppError::Config(e.to_string()))?
            }
        };
        let assembler = StoryAssembler::new(Arc::new(fetcher), Arc::new(SystemClock))
            .with_config(AssemblerConfig {
                allow_local_paths: config.allow_local_image_paths,
            });

        let mut state = Self::new(story_generator, assembler)
            .with_default_image_model(config.image_model)
            .with_mock_images(config.mock_images)
            .with_story_fallback(config.story_fallback);

        if let Some(key) = &config.openai_api_key {
            state = state.with_image_generator(Arc::new(OpenAiImageGenerator::new(
                client.clone(),
                key.clone(),
            )));
        }
        if let Some(key) = &config.google_ai_api_key {
            state = state.with_image_generator(Arc::new(GeminiImageGenerator::new(
                client,
                key.clone(),
                config.gemini_image_model.clone(),
            )));
        }

        if !config.mock_images && !state.image_generators.contains_key(&config.image_model) {
            return Err(AppError::Config(format!(
                "IMAGE_MODEL {} has no API key configured",
                config.image_model
            )));
        }

        info!(
            default_image_model = %state.default_image_model,
            image_backends = state.image_generators.len(),
            mock_images = state.mock_images,
            story_fallback = state.story_fallback,
            "application state ready"
        );
        Ok(state)
    }

    /// The backend for `requested`, or the default one.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if that backend is not configured.
    pub fn image_generator(
        &self,
        requested: Option<ImageModel>,
    ) -> Result<Arc<dyn ImageGenerator>, DomainError> {
        let model = requested.unwrap_or(self.default_image_model);
        self.image_generators.get(&model).cloned().ok_or_else(|| {
            DomainError::validation(format!("image model {model} is not configured"))
        })
    }
}
