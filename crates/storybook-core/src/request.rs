//! Inputs to the generation collaborators.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::generator::ImageModel;
use crate::story::{Story, check_length};

/// Illustration style used when the caller does not name one.
pub const DEFAULT_ILLUSTRATION_STYLE: &str = "warm watercolor";

/// Youngest supported reader age.
pub const MIN_AGE: u32 = 3;
/// Oldest supported reader age.
pub const MAX_AGE: u32 = 10;
/// Shortest supported reading time, in minutes.
pub const MIN_MINUTES: u32 = 3;
/// Longest supported reading time, in minutes.
pub const MAX_MINUTES: u32 = 12;

/// Pronouns used for the story's hero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pronouns {
    /// she/her
    #[serde(rename = "she/her")]
    SheHer,
    /// he/him
    #[serde(rename = "he/him")]
    HeHim,
    /// they/them
    #[serde(rename = "they/them")]
    TheyThem,
}

impl fmt::Display for Pronouns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::SheHer => "she/her",
            Self::HeHim => "he/him",
            Self::TheyThem => "they/them",
        };
        f.write_str(label)
    }
}

/// The parent's form input for a new story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryRequest {
    /// The child who becomes the story's hero.
    pub child_name: String,
    /// Reader age in years.
    pub age: u32,
    /// Pronouns for the hero.
    pub pronouns: Pronouns,
    /// Target reading time in minutes.
    pub minutes: u32,
    /// Theme, moral, or subject chosen by the parent.
    pub topic: String,
    /// Art direction for the illustrations.
    #[serde(default = "default_illustration_style")]
    pub illustration_style: String,
}

fn default_illustration_style() -> String {
    DEFAULT_ILLUSTRATION_STYLE.to_owned()
}

impl StoryRequest {
    /// Checks field ranges.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for the first out-of-range field.
    pub fn validate(&self) -> Result<(), DomainError> {
        check_length("childName", &self.child_name, 1, usize::MAX)?;
        if !(MIN_AGE..=MAX_AGE).contains(&self.age) {
            return Err(DomainError::validation(format!(
                "age must be between {MIN_AGE} and {MAX_AGE}, got {}",
                self.age
            )));
        }
        if !(MIN_MINUTES..=MAX_MINUTES).contains(&self.minutes) {
            return Err(DomainError::validation(format!(
                "minutes must be between {MIN_MINUTES} and {MAX_MINUTES}, got {}",
                self.minutes
            )));
        }
        check_length("topic", &self.topic, 2, usize::MAX)
    }
}

/// Request to illustrate every page of a story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagesRequest {
    /// The story to illustrate.
    pub story: Story,
    /// Art direction applied to every page.
    pub illustration_style: String,
    /// Name of the hero, used to keep the character consistent.
    #[serde(default)]
    pub child_name: Option<String>,
    /// Backend override; the configured default is used when absent.
    #[serde(default)]
    pub ai_model: Option<ImageModel>,
}

impl ImagesRequest {
    /// Validates the embedded story and the style/name fields.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for the first violated constraint.
    pub fn validate(&self) -> Result<(), DomainError> {
        self.story.validate()?;
        check_length("illustrationStyle", &self.illustration_style, 2, usize::MAX)?;
        if let Some(name) = &self.child_name {
            check_length("childName", name, 1, usize::MAX)?;
        }
        Ok(())
    }
}

/// Image references for a story, one per page in page order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagesResponse {
    /// URLs or data URIs.
    pub images: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> StoryRequest {
        serde_json::from_value(serde_json::json!({
            "childName": "Ana",
            "age": 5,
            "pronouns": "she/her",
            "minutes": 6,
            "topic": "kindness"
        }))
        .unwrap()
    }

    #[test]
    fn test_illustration_style_defaults_to_warm_watercolor() {
        let req = request();

        assert_eq!(req.illustration_style, DEFAULT_ILLUSTRATION_STYLE);
        assert_eq!(req.pronouns, Pronouns::SheHer);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_age_out_of_range_is_rejected() {
        let mut req = request();
        req.age = 11;

        let err = req.validate().unwrap_err();

        assert!(err.to_string().contains("age"));
    }

    #[test]
    fn test_minutes_out_of_range_is_rejected() {
        let mut req = request();
        req.minutes = 2;

        assert!(req.validate().is_err());
    }

    #[test]
    fn test_short_topic_is_rejected() {
        let mut req = request();
        req.topic = "x".to_owned();

        let err = req.validate().unwrap_err();

        assert!(err.to_string().contains("topic"));
    }

    #[test]
    fn test_unknown_pronouns_fail_to_parse() {
        let result: Result<StoryRequest, _> = serde_json::from_value(serde_json::json!({
            "childName": "Ana",
            "age": 5,
            "pronouns": "xe/xem",
            "minutes": 6,
            "topic": "kindness"
        }));

        assert!(result.is_err());
    }

    #[test]
    fn test_images_request_parses_model_selector() {
        let pages: Vec<_> = (1..=8)
            .map(|i| serde_json::json!({"text": format!("Page {i}."), "image_prompt": "a cozy scene"}))
            .collect();
        let req: ImagesRequest = serde_json::from_value(serde_json::json!({
            "story": {"title": "Moon Walk", "pages": pages},
            "illustrationStyle": "pastel crayon",
            "aiModel": "google-nano-banana"
        }))
        .unwrap();

        assert_eq!(req.ai_model, Some(ImageModel::GoogleNanoBanana));
        assert_eq!(req.child_name, None);
        assert!(req.validate().is_ok());
    }
}
