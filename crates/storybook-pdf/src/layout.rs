//! Page geometry.
//!
//! All values are PDF points. Rectangles use a top-left origin, like the
//! layout reads on paper; the canvas flips to PDF's bottom-left origin when
//! emitting operators.

use crate::text;

/// US Letter width.
pub const PAGE_WIDTH: f32 = 612.0;
/// US Letter height.
pub const PAGE_HEIGHT: f32 = 792.0;
/// Outer margin on every side.
pub const MARGIN: f32 = 36.0;
/// Width available between the side margins.
pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

/// Title font size (first sheet only).
pub const TITLE_FONT_SIZE: f32 = 26.0;
/// Baseline-to-baseline distance between wrapped title lines.
pub const TITLE_LINE_HEIGHT: f32 = TITLE_FONT_SIZE * 1.2;
/// Space between the last title line and the image region.
pub const TITLE_GAP: f32 = 24.0;

/// Space between the image region and the text panel.
pub const PANEL_GAP: f32 = 12.0;
/// Fixed text panel height.
pub const PANEL_HEIGHT: f32 = 96.0;
/// Text panel corner radius.
pub const PANEL_RADIUS: f32 = 8.0;
/// Inset between the panel border and its text.
pub const PANEL_PADDING: f32 = 12.0;
/// Panel fill opacity (black fill, so the panel reads as near-white).
pub const PANEL_FILL_OPACITY: f32 = 0.06;

/// Page text font size.
pub const BODY_FONT_SIZE: f32 = 14.0;
/// Baseline-to-baseline distance for page text.
pub const BODY_LINE_HEIGHT: f32 = BODY_FONT_SIZE * 1.3;

/// Page number font size.
pub const PAGE_NUMBER_FONT_SIZE: f32 = 10.0;
/// Band above the bottom margin kept clear for the page number.
pub const FOOTER_HEIGHT: f32 = 16.0;

/// Vertical space below the image region reserved for the panel and footer.
pub const RESERVED_BELOW_IMAGE: f32 = PANEL_GAP + PANEL_HEIGHT + FOOTER_HEIGHT;

/// Caption drawn over the placeholder for vector (mock) art.
pub const MOCK_IMAGE_CAPTION: &str = "Mock Image";
/// Caption drawn over the placeholder when an image cannot be used.
pub const FAILED_IMAGE_CAPTION: &str = "Image failed to load";

/// Caption size for the mock-image placeholder.
pub const MOCK_CAPTION_SIZE: f32 = 24.0;
/// Caption size for the failed-image placeholder.
pub const FAILED_CAPTION_SIZE: f32 = 12.0;

/// RGB color with components in `0.0..=1.0`.
pub type Rgb = (f32, f32, f32);

/// Body and title text.
pub const INK: Rgb = (0.0, 0.0, 0.0);
/// `#f3f4f6`, placeholder fill.
pub const PLACEHOLDER_FILL: Rgb = (0.953, 0.957, 0.965);
/// `#6b7280`, captions and page numbers.
pub const MUTED: Rgb = (0.420, 0.447, 0.502);
/// `#e5e7eb`, panel border.
pub const PANEL_BORDER: Rgb = (0.898, 0.906, 0.922);

/// Axis-aligned rectangle with a top-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge, measured down from the top of the page.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// Horizontal center.
    #[must_use]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Vertical center.
    #[must_use]
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Largest rectangle with the given aspect ratio that fits inside `self`,
    /// centered on both axes.
    #[must_use]
    pub fn fit_centered(&self, source_width: f32, source_height: f32) -> Rect {
        if source_width <= 0.0 || source_height <= 0.0 {
            return *self;
        }
        let scale = (self.width / source_width).min(self.height / source_height);
        let width = source_width * scale;
        let height = source_height * scale;
        Rect {
            x: self.x + (self.width - width) / 2.0,
            y: self.y + (self.height - height) / 2.0,
            width,
            height,
        }
    }
}

/// Geometry of one sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    /// Wrapped title lines; empty on every sheet but the first.
    pub title_lines: Vec<String>,
    /// Illustration area.
    pub image: Rect,
    /// Rounded text panel.
    pub panel: Rect,
}

impl SheetLayout {
    /// Computes the layout for the sheet at `index` (0-based).
    ///
    /// The image region shrinks by the height of the title block on the first
    /// sheet, so panel and footer positions stay inside the margins whatever
    /// the title length.
    #[must_use]
    pub fn for_page(index: usize, title: &str) -> Self {
        let title_lines = if index == 0 {
            text::wrap(title, CONTENT_WIDTH, TITLE_FONT_SIZE)
        } else {
            Vec::new()
        };
        let title_block = title_block_height(title_lines.len());

        let image_top = MARGIN + title_block;
        let image_height =
            (PAGE_HEIGHT - 2.0 * MARGIN - title_block - RESERVED_BELOW_IMAGE).max(0.0);
        let image = Rect {
            x: MARGIN,
            y: image_top,
            width: CONTENT_WIDTH,
            height: image_height,
        };
        let panel = Rect {
            x: MARGIN,
            y: image.bottom() + PANEL_GAP,
            width: CONTENT_WIDTH,
            height: PANEL_HEIGHT,
        };

        Self {
            title_lines,
            image,
            panel,
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn title_block_height(lines: usize) -> f32 {
    if lines == 0 {
        0.0
    } else {
        lines as f32 * TITLE_LINE_HEIGHT + TITLE_GAP
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untitled_sheet_fills_content_area() {
        let layout = SheetLayout::for_page(3, "Ignored Title");

        assert!(layout.title_lines.is_empty());
        assert!((layout.image.y - MARGIN).abs() < f32::EPSILON);
        assert!((layout.image.width - CONTENT_WIDTH).abs() < f32::EPSILON);
        assert!(
            (layout.panel.bottom() + FOOTER_HEIGHT - (PAGE_HEIGHT - MARGIN)).abs() < 0.01,
            "panel should end exactly one footer band above the bottom margin"
        );
    }

    #[test]
    fn test_title_pushes_image_down_and_shrinks_it() {
        let first = SheetLayout::for_page(0, "Ana's Kindness Adventure");
        let second = SheetLayout::for_page(1, "Ana's Kindness Adventure");

        assert_eq!(first.title_lines, vec!["Ana's Kindness Adventure".to_owned()]);
        assert!(first.image.y > second.image.y);
        assert!(first.image.height < second.image.height);
        // The panel sits at the same place on every sheet.
        assert!((first.panel.y - second.panel.y).abs() < 0.01);
    }

    #[test]
    fn test_long_title_wraps_and_still_fits() {
        let title = "The Very Long and Winding Tale of a Brave Little Hedgehog Who Counted Stars";
        let layout = SheetLayout::for_page(0, title);

        assert!(layout.title_lines.len() > 1);
        assert!(layout.image.height > 0.0);
        assert!(layout.panel.bottom() <= PAGE_HEIGHT - MARGIN);
    }

    #[test]
    fn test_fit_centered_preserves_aspect_ratio() {
        let region = Rect {
            x: 0.0,
            y: 0.0,
            width: 200.0,
            height: 100.0,
        };

        let fitted = region.fit_centered(50.0, 50.0);

        assert!((fitted.width - 100.0).abs() < 0.01);
        assert!((fitted.height - 100.0).abs() < 0.01);
        assert!((fitted.x - 50.0).abs() < 0.01);
        assert!(fitted.y.abs() < 0.01);
    }
}
