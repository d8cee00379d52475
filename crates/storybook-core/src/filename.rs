//! Download filename derived from a story title.

/// Filename stem used when the title is empty.
pub const DEFAULT_STEM: &str = "story";

/// Returns `<stem>.pdf`, where every character of `title` outside
/// `[A-Za-z0-9-_.]` becomes one `_` per UTF-16 code unit, so characters
/// beyond the Basic Multilingual Plane yield `__`.
///
/// ```
/// use storybook_core::filename::suggested_filename;
///
/// assert_eq!(suggested_filename("My/Story: Part 1?"), "My_Story__Part_1_.pdf");
/// assert_eq!(suggested_filename(""), "story.pdf");
/// ```
#[must_use]
pub fn suggested_filename(title: &str) -> String {
    let stem = if title.is_empty() { DEFAULT_STEM } else { title };
    let mut sanitized = String::with_capacity(stem.len());
    for c in stem.chars() {
        if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
            sanitized.push(c);
        } else {
            sanitized.extend(std::iter::repeat_n('_', c.len_utf16()));
        }
    }
    format!("{sanitized}.pdf")
}
