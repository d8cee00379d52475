//! Drawing primitives for one sheet.
//!
//! Every primitive is bracketed by `q`/`Q`, so fill color and opacity set by
//! one step never reach the next step or the next sheet.

use lopdf::content::Operation;
use lopdf::{Dictionary, Document, Object, Stream, StringFormat, dictionary};

use crate::layout::{PAGE_HEIGHT, Rect, Rgb};
use crate::raster::RasterImage;
use crate::text::{self, ASCENT};

/// Resource name of the shared Helvetica font.
pub(crate) const FONT_NAME: &str = "F1";
/// Resource name of the translucent panel graphics state.
pub(crate) const PANEL_STATE_NAME: &str = "GSPanel";

/// Bézier control-point factor for quarter-circle arcs.
const KAPPA: f32 = 0.552_284_8;

/// Horizontal text anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Align {
    Left,
    Center,
    Right,
}

/// Accumulates the content stream and image resources of one sheet.
pub(crate) struct PageCanvas<'a> {
    document: &'a mut Document,
    operations: Vec<Operation>,
    xobjects: Dictionary,
    image_count: usize,
}

impl<'a> PageCanvas<'a> {
    pub(crate) fn new(document: &'a mut Document) -> Self {
        Self {
            document,
            operations: Vec::new(),
            xobjects: Dictionary::new(),
            image_count: 0,
        }
    }

    /// Consumes the canvas, returning its operations and `XObject` resources.
    pub(crate) fn finish(self) -> (Vec<Operation>, Dictionary) {
        (self.operations, self.xobjects)
    }

    fn push(&mut self, operator: &str, operands: Vec<Object>) {
        self.operations.push(Operation::new(operator, operands));
    }

    fn save(&mut self) {
        self.push("q", vec![]);
    }

    fn restore(&mut self) {
        self.push("Q", vec![]);
    }

    fn set_fill(&mut self, (r, g, b): Rgb) {
        self.push("rg", vec![r.into(), g.into(), b.into()]);
    }

    fn set_stroke(&mut self, (r, g, b): Rgb) {
        self.push("RG", vec![r.into(), g.into(), b.into()]);
    }

    /// Solid rectangle.
    pub(crate) fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        self.save();
        self.set_fill(color);
        self.push(
            "re",
            vec![
                rect.x.into(),
                (PAGE_HEIGHT - rect.bottom()).into(),
                rect.width.into(),
                rect.height.into(),
            ],
        );
        self.push("f", vec![]);
        self.restore();
    }

    /// Rounded rectangle filled through the panel graphics state and stroked
    /// with `border`.
    pub(crate) fn panel(&mut self, rect: Rect, radius: f32, fill: Rgb, border: Rgb) {
        let left = rect.x;
        let right = rect.x + rect.width;
        let top = PAGE_HEIGHT - rect.y;
        let bottom = PAGE_HEIGHT - rect.bottom();
        let r = radius.min(rect.width / 2.0).min(rect.height / 2.0);
        let k = r * KAPPA;

        self.save();
        self.push("gs", vec![Object::Name(PANEL_STATE_NAME.as_bytes().to_vec())]);
        self.set_fill(fill);
        self.set_stroke(border);
        self.push("m", vec![(left + r).into(), bottom.into()]);
        self.push("l", vec![(right - r).into(), bottom.into()]);
        self.curve(right - r + k, bottom, right, bottom + r - k, right, bottom + r);
        self.push("l", vec![right.into(), (top - r).into()]);
        self.curve(right, top - r + k, right - r + k, top, right - r, top);
        self.push("l", vec![(left + r).into(), top.into()]);
        self.curve(left + r - k, top, left, top - r + k, left, top - r);
        self.push("l", vec![left.into(), (bottom + r).into()]);
        self.curve(left, bottom + r - k, left + r - k, bottom, left + r, bottom);
        self.push("h", vec![]);
        self.push("B", vec![]);
        self.restore();
    }

    fn curve(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32) {
        self.push(
            "c",
            vec![x1.into(), y1.into(), x2.into(), y2.into(), x3.into(), y3.into()],
        );
    }

    /// One line of Helvetica text. `baseline` is measured from the top of the
    /// page; `x` is the left edge, center, or right edge depending on `align`.
    pub(crate) fn text_line(
        &mut self,
        line: &str,
        x: f32,
        baseline: f32,
        size: f32,
        color: Rgb,
        align: Align,
    ) {
        let width = text::text_width(line, size);
        let left = match align {
            Align::Left => x,
            Align::Center => x - width / 2.0,
            Align::Right => x - width,
        };

        self.save();
        self.set_fill(color);
        self.push("BT", vec![]);
        self.push(
            "Tf",
            vec![Object::Name(FONT_NAME.as_bytes().to_vec()), size.into()],
        );
        self.push("Td", vec![left.into(), (PAGE_HEIGHT - baseline).into()]);
        self.push(
            "Tj",
            vec![Object::String(
                text::encode_win_ansi(line),
                StringFormat::Literal,
            )],
        );
        self.push("ET", vec![]);
        self.restore();
    }

    /// Single line of text centered on both axes of `rect`.
    pub(crate) fn centered_caption(&mut self, caption: &str, rect: Rect, size: f32, color: Rgb) {
        let baseline = rect.center_y() + size * ASCENT / 2.0;
        self.text_line(caption, rect.center_x(), baseline, size, color, Align::Center);
    }

    /// Embeds `raster` as an image `XObject` and paints it into `rect`,
    /// scaled to fit and centered.
    pub(crate) fn image(&mut self, raster: RasterImage, rect: Rect) {
        #[allow(clippy::cast_precision_loss)]
        let placed = rect.fit_centered(raster.width as f32, raster.height as f32);

        let stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => i64::from(raster.width),
                "Height" => i64::from(raster.height),
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8_i64,
            },
            raster.rgb,
        );
        let image_id = self.document.add_object(stream);

        self.image_count += 1;
        let name = format!("Im{}", self.image_count);
        self.xobjects.set(name.as_bytes().to_vec(), image_id);

        self.save();
        self.push(
            "cm",
            vec![
                placed.width.into(),
                0.0_f32.into(),
                0.0_f32.into(),
                placed.height.into(),
                placed.x.into(),
                (PAGE_HEIGHT - placed.bottom()).into(),
            ],
        );
        self.push("Do", vec![Object::Name(name.into_bytes())]);
        self.restore();
    }
}
