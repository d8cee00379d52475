//! Offline generators for development, demos, and upstream outages.

use async_trait::async_trait;
use storybook_core::error::DomainError;
use storybook_core::generator::StoryGenerator;
use storybook_core::request::StoryRequest;
use storybook_core::story::{Page, Story};
use tracing::debug;

use crate::prompts::STORY_PAGE_COUNT;
use crate::svg;

/// Fill colors cycled across mock illustrations.
const MOCK_PALETTE: [&str; 5] = ["#fbbf24", "#34d399", "#60a5fa", "#a78bfa", "#f87171"];

/// Title of the story served when generation fails and fallback is enabled.
pub const FALLBACK_TITLE: &str = "A Cozy Night of Kindness";

fn beat(index: usize, name: &str, topic: &str) -> String {
    match index % STORY_PAGE_COUNT {
        0 => format!("{name} hears a gentle idea about {topic} and feels curious."),
        1 => format!("{name} meets a kind helper who shares a story about {topic}."),
        2 => format!("{name} tries a small act related to {topic} and smiles at the result."),
        3 => format!("{name} learns a friendly lesson about patience and {topic}."),
        4 => format!("{name} notices how {topic} can make friends feel safe and happy."),
        5 => format!("{name} practices {topic} again, a little braver this time."),
        6 => format!("{name} teaches someone else a tiny tip about {topic}."),
        7 => format!("{name} discovers that mistakes with {topic} are okay and help us grow."),
        8 => format!("{name} uses {topic} to solve a gentle problem before bedtime."),
        _ => format!("Tucked in and cozy, {name} dreams of tomorrow and more {topic}."),
    }
}

/// Builds a ten-page story from fixed narrative beats without calling any
/// model.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockStoryGenerator;

#[async_trait]
impl StoryGenerator for MockStoryGenerator {
    async fn generate(&self, request: &StoryRequest) -> Result<Story, DomainError> {
        let pages = (0..STORY_PAGE_COUNT)
            .map(|i| {
                Page::new(
                    beat(i, &request.child_name, &request.topic),
                    format!(
                        "{} -- soft cozy colors, bedtime picture book style, scene {}",
                        request.illustration_style,
                        i + 1
                    ),
                )
            })
            .collect();
        let story = Story::new(
            format!("{}'s {} Adventure", request.child_name, request.topic),
            pages,
        );
        // Long names or topics can push the title past its limit.
        story.validate()?;
        debug!(title = %story.title, "mock story generated");
        Ok(story)
    }
}

/// The story served in place of a failed generation.
#[must_use]
pub fn fallback_story() -> Story {
    Story::new(
        FALLBACK_TITLE,
        (1..=STORY_PAGE_COUNT)
            .map(|n| {
                Page::new(
                    format!(
                        "On page {n}, our hero discovers small ways to be kind and brave, \
                         drifting toward sweet dreams."
                    ),
                    format!("soft watercolor, bedtime scene, stars and moon, page {n}"),
                )
            })
            .collect(),
    )
}

/// Colored SVG card captioned "Mock Image {n}" for the page at `index`
/// (0-based), cycling through a five-color palette.
#[must_use]
pub fn mock_card(index: usize) -> String {
    let fill = MOCK_PALETTE[index % MOCK_PALETTE.len()];
    svg::data_uri(&svg::captioned_card(
        fill,
        &format!("Mock Image {}", index + 1),
        "white",
        true,
    ))
}

/// One mock card per page of `story`, in page order.
#[must_use]
pub fn mock_illustrations(story: &Story) -> Vec<String> {
    (0..story.pages.len()).map(mock_card).collect()
}
