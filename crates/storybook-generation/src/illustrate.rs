//! Illustrating a whole story, one page at a time.

use storybook_core::generator::ImageGenerator;
use storybook_core::story::Story;
use tracing::{info, instrument, warn};

use crate::prompts::illustration_prompt;
use crate::svg;

/// Caption of the card returned for a page whose illustration failed.
pub const FAILED_IMAGE_PLACEHOLDER_TEXT: &str = "Image failed to generate";

fn failed_placeholder() -> String {
    svg::data_uri(&svg::captioned_card(
        "#f3f4f6",
        FAILED_IMAGE_PLACEHOLDER_TEXT,
        "#6b7280",
        false,
    ))
}

/// Requests one illustration per page, in page order, and returns the image
/// references in the same order.
///
/// The hero is `child_name` when given, else the story title. A page whose
/// request fails gets a gray placeholder card; the batch itself never fails.
#[instrument(skip_all, fields(model = %generator.model(), pages = story.pages.len()))]
pub async fn illustrate_story(
    generator: &dyn ImageGenerator,
    story: &Story,
    style: &str,
    child_name: Option<&str>,
) -> Vec<String> {
    let hero = child_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or(story.title.as_str());

    let mut images = Vec::with_capacity(story.pages.len());
    let mut failures = 0_usize;
    for (index, page) in story.pages.iter().enumerate() {
        let page_number = index + 1;
        let prompt = illustration_prompt(style, hero, &page.image_prompt, page_number);
        match generator.generate_image(&prompt).await {
            Ok(image) => images.push(image),
            Err(error) => {
                failures += 1;
                warn!(page = page_number, %error, "illustration failed; using placeholder");
                images.push(failed_placeholder());
            }
        }
    }

    info!(failures, "story illustrated");
    images
}
