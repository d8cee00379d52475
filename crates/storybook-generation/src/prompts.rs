//! Prompt text sent to the generation backends.

use storybook_core::request::StoryRequest;

/// Pages requested from the story model.
pub const STORY_PAGE_COUNT: usize = 10;

/// Instructions fixing tone, reading time, and the JSON response shape.
#[must_use]
pub fn system_prompt(age: u32, minutes: u32) -> String {
    format!(
        "You are a children's author for ages {age}.\n\
         Constraints: positive, kid-safe, cozy bedtime tone.\n\
         Reading time \u{2248} {minutes} minutes, short sentences, simple vocabulary.\n\
         Return ONLY valid JSON per schema: \
         {{ \"title\": string, \"pages\": [{{ \"text\": string, \"image_prompt\": string }}] }}."
    )
}

/// The parent's choices rendered as the story brief.
#[must_use]
pub fn user_prompt(request: &StoryRequest) -> String {
    format!(
        "Child: {name} ({pronouns}), Age {age}\n\
         Topic from parent (theme/moral/subject): {topic}.\n\
         Derive a positive, age-appropriate theme and gentle moral from this topic \
         that encourages kindness, resilience, and curiosity.\n\
         Structure: Title + {STORY_PAGE_COUNT} pages. Each page 1\u{2013}2 sentences.\n\
         Illustration style: {style}. Soothing palette.\n\
         Consistent recurring character using the child's name.",
        name = request.child_name,
        pronouns = request.pronouns,
        age = request.age,
        topic = request.topic,
        style = request.illustration_style,
    )
}

/// Full illustration prompt for one page.
///
/// Every page repeats the same art-style and character description so the
/// hero looks alike across the book. `hero` is the child's name, or the story
/// title when no name was given; a blank `scene` falls back to
/// `"page {page_number} of the story"`.
#[must_use]
pub fn illustration_prompt(style: &str, hero: &str, scene: &str, page_number: usize) -> String {
    let scene = if scene.trim().is_empty() {
        format!("page {page_number} of the story")
    } else {
        scene.to_owned()
    };
    format!(
        "{style} children's picture book illustration style, warm and cozy bedtime atmosphere, \
         soft lighting, gentle colors, child-friendly, safe and appropriate for young children, \
         main character {hero}, a young child with consistent appearance: same hair style and \
         color, same facial features, same clothing style, same age and build throughout the \
         story. The character should be the same person in every image., scene: {scene}, \
         no sleeping children in beds unless specifically mentioned in the story text, \
         focus on the main character's actions and emotions"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use storybook_core::request::Pronouns;

    fn request() -> StoryRequest {
        StoryRequest {
            child_name: "Ana".into(),
            age: 5,
            pronouns: Pronouns::SheHer,
            minutes: 5,
            topic: "sharing".into(),
            illustration_style: "warm watercolor".into(),
        }
    }

    #[test]
    fn test_system_prompt_carries_age_minutes_and_schema() {
        let prompt = system_prompt(6, 8);

        assert!(prompt.contains("ages 6"));
        assert!(prompt.contains("8 minutes"));
        assert!(prompt.contains(r#"{ "title": string, "pages": [{ "text": string, "image_prompt": string }] }"#));
    }

    #[test]
    fn test_user_prompt_names_child_topic_and_style() {
        let prompt = user_prompt(&request());

        assert!(prompt.starts_with("Child: Ana (she/her), Age 5"));
        assert!(prompt.contains("sharing"));
        assert!(prompt.contains("Title + 10 pages"));
        assert!(prompt.contains("Illustration style: warm watercolor."));
    }

    #[test]
    fn test_illustration_prompt_falls_back_to_page_number() {
        let prompt = illustration_prompt("pastel", "Ana", "  ", 3);

        assert!(prompt.starts_with("pastel children's picture book"));
        assert!(prompt.contains("main character Ana,"));
        assert!(prompt.contains("scene: page 3 of the story,"));
    }
}
