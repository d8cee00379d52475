//! Environment configuration.

use std::time::Duration;

use storybook_core::generator::ImageModel;
use storybook_generation::gemini::DEFAULT_GEMINI_IMAGE_MODEL;

use crate::error::AppError;

/// Default remote image fetch timeout, in seconds.
pub const DEFAULT_IMAGE_FETCH_TIMEOUT_SECS: u64 = 30;

/// Settings read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Bind address (`HOST`).
    pub host: String,
    /// Bind port (`PORT`).
    pub port: u16,
    /// `OPENAI_API_KEY`; required unless both generators are mocked.
    pub openai_api_key: Option<String>,
    /// `GOOGLE_AI_API_KEY`; enables the Gemini image backend.
    pub google_ai_api_key: Option<String>,
    /// `GEMINI_IMAGE_MODEL`.
    pub gemini_image_model: String,
    /// `IMAGE_MODEL`: backend used when a request names none.
    pub image_model: ImageModel,
    /// `MOCK_AI=true` serves template stories without calling a model.
    pub mock_ai: bool,
    /// `MOCK_IMAGES=true` serves colored SVG cards instead of illustrations.
    pub mock_images: bool,
    /// Serve the fallback story on failure; disabled only by
    /// `MOCK_AI_FALLBACK=false`.
    pub story_fallback: bool,
    /// `IMAGE_FETCH_TIMEOUT_SECS`; `0` disables the timeout.
    pub image_fetch_timeout: Option<Duration>,
    /// `ALLOW_LOCAL_IMAGE_PATHS=true` lets exports read images from disk.
    pub allow_local_image_paths: bool,
    /// `OTEL_EXPORTER_OTLP_ENDPOINT`; spans are exported when set.
    pub otlp_endpoint: Option<String>,
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable holds an unparsable value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable holds an unparsable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match non_empty("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?,
            None => 3000,
        };

        let image_model = match non_empty("IMAGE_MODEL") {
            Some(raw) => raw
                .parse()
                .map_err(|e| AppError::Config(format!("IMAGE_MODEL: {e}")))?,
            None => ImageModel::default(),
        };

        let timeout_secs = match non_empty("IMAGE_FETCH_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|e| {
                AppError::Config(format!("IMAGE_FETCH_TIMEOUT_SECS must be whole seconds: {e}"))
            })?,
            None => DEFAULT_IMAGE_FETCH_TIMEOUT_SECS,
        };

        let enabled = |key: &str| lookup(key).is_some_and(|v| v == "true");

        Ok(Self {
            host: non_empty("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            openai_api_key: non_empty("OPENAI_API_KEY"),
            google_ai_api_key: non_empty("GOOGLE_AI_API_KEY"),
            gemini_image_model: non_empty("GEMINI_IMAGE_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_IMAGE_MODEL.to_string()),
            image_model,
            mock_ai: enabled("MOCK_AI"),
            mock_images: enabled("MOCK_IMAGES"),
            story_fallback: lookup("MOCK_AI_FALLBACK").is_none_or(|v| v != "false"),
            image_fetch_timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            allow_local_image_paths: enabled("ALLOW_LOCAL_IMAGE_PATHS"),
            otlp_endpoint: non_empty("OTEL_EXPORTER_OTLP_ENDPOINT"),
        })
    }

    /// `HOST:PORT`.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, AppError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert_eq!(config.image_model, ImageModel::OpenAiDalle3);
        assert_eq!(config.gemini_image_model, "gemini-2.0-flash-exp");
        assert!(!config.mock_ai);
        assert!(!config.mock_images);
        assert!(config.story_fallback);
        assert_eq!(config.image_fetch_timeout, Some(Duration::from_secs(30)));
        assert!(!config.allow_local_image_paths);
        assert_eq!(config.otlp_endpoint, None);
    }

    #[test]
    fn test_switches_and_overrides_are_read() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("IMAGE_MODEL", "google-nano-banana"),
            ("MOCK_AI", "true"),
            ("MOCK_IMAGES", "true"),
            ("MOCK_AI_FALLBACK", "false"),
            ("IMAGE_FETCH_TIMEOUT_SECS", "0"),
            ("ALLOW_LOCAL_IMAGE_PATHS", "true"),
            ("OPENAI_API_KEY", "sk-test"),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.image_model, ImageModel::GoogleNanoBanana);
        assert!(config.mock_ai);
        assert!(config.mock_images);
        assert!(!config.story_fallback);
        assert_eq!(config.image_fetch_timeout, None);
        assert!(config.allow_local_image_paths);
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn test_only_the_literal_true_enables_a_switch() {
        let config = config_from(&[("MOCK_AI", "yes"), ("MOCK_AI_FALLBACK", "0")]).unwrap();

        assert!(!config.mock_ai);
        assert!(config.story_fallback);
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        assert!(matches!(config_from(&[("PORT", "http")]), Err(AppError::Config(_))));
        assert!(matches!(
            config_from(&[("IMAGE_MODEL", "midjourney")]),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            config_from(&[("IMAGE_FETCH_TIMEOUT_SECS", "-1")]),
            Err(AppError::Config(_))
        ));
    }
}
