//! The story document: a title and an ordered list of illustrated pages.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Minimum title length, in characters.
pub const TITLE_MIN_CHARS: usize = 2;
/// Maximum title length, in characters.
pub const TITLE_MAX_CHARS: usize = 80;
/// Minimum number of pages in a story.
pub const MIN_PAGES: usize = 8;
/// Maximum number of pages in a story.
pub const MAX_PAGES: usize = 12;
/// Maximum narrative length of a single page, in characters.
pub const PAGE_TEXT_MAX_CHARS: usize = 220;
/// Minimum illustration prompt length, in characters.
pub const IMAGE_PROMPT_MIN_CHARS: usize = 5;
/// Maximum illustration prompt length, in characters.
pub const IMAGE_PROMPT_MAX_CHARS: usize = 400;

/// A generated bedtime story. Page order is rendering order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    /// Story title, rendered once on the first sheet.
    pub title: String,
    /// Ordered pages; page 1 is the first element.
    pub pages: Vec<Page>,
}

/// One narrative unit of a story and its illustration reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Narrative text for this page.
    pub text: String,
    /// Descriptive prompt used to request the illustration.
    pub image_prompt: String,
    /// Remote URL or data URI of the illustration, once generated.
    #[serde(rename = "imageUrl", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Page {
    /// Creates a page without an illustration.
    pub fn new(text: impl Into<String>, image_prompt: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            image_prompt: image_prompt.into(),
            image_url: None,
        }
    }

    /// Returns this page with the given illustration reference attached.
    #[must_use]
    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    fn validate(&self, page_number: usize) -> Result<(), DomainError> {
        check_length(
            &format!("pages[{page_number}].text"),
            &self.text,
            1,
            PAGE_TEXT_MAX_CHARS,
        )?;
        check_length(
            &format!("pages[{page_number}].image_prompt"),
            &self.image_prompt,
            IMAGE_PROMPT_MIN_CHARS,
            IMAGE_PROMPT_MAX_CHARS,
        )?;
        if let Some(url) = &self.image_url {
            if !has_uri_scheme(url) {
                return Err(DomainError::validation(format!(
                    "pages[{page_number}].imageUrl must be a URL or data URI"
                )));
            }
        }
        Ok(())
    }
}

impl Story {
    /// Creates a story from a title and its pages.
    pub fn new(title: impl Into<String>, pages: Vec<Page>) -> Self {
        Self {
            title: title.into(),
            pages,
        }
    }

    /// Checks the title, page count, and every page against the story schema.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` describing the first violated
    /// constraint.
    pub fn validate(&self) -> Result<(), DomainError> {
        check_length("title", &self.title, TITLE_MIN_CHARS, TITLE_MAX_CHARS)?;

        let count = self.pages.len();
        if !(MIN_PAGES..=MAX_PAGES).contains(&count) {
            return Err(DomainError::validation(format!(
                "pages must contain between {MIN_PAGES} and {MAX_PAGES} items, got {count}"
            )));
        }

        for (index, page) in self.pages.iter().enumerate() {
            page.validate(index)?;
        }
        Ok(())
    }

    /// Returns a copy of this story with `images[i]` attached to page `i`.
    ///
    /// Missing or empty entries keep the page's existing reference, so a
    /// partial image list never erases an earlier illustration.
    #[must_use]
    pub fn with_images(&self, images: &[String]) -> Self {
        let pages = self
            .pages
            .iter()
            .enumerate()
            .map(|(index, page)| match images.get(index) {
                Some(image) if !image.is_empty() => page.clone().with_image_url(image.clone()),
                _ => page.clone(),
            })
            .collect();

        Self {
            title: self.title.clone(),
            pages,
        }
    }
}

/// Checks that `value` has between `min` and `max` characters, inclusive.
pub(crate) fn check_length(
    field: &str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), DomainError> {
    let len = value.chars().count();
    if len < min {
        return Err(DomainError::validation(format!(
            "{field} must be at least {min} characters, got {len}"
        )));
    }
    if len > max {
        return Err(DomainError::validation(format!(
            "{field} must be at most {max} characters, got {len}"
        )));
    }
    Ok(())
}

/// Returns `true` when `value` starts with an RFC 3986 scheme followed by a
/// non-empty remainder, e.g. `https://…` or `data:image/png;base64,…`.
fn has_uri_scheme(value: &str) -> bool {
    let Some((scheme, rest)) = value.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    let starts_alpha = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    starts_alpha
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        && !rest.is_empty()
}
