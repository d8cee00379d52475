//! Story → PDF assembly.

use std::sync::Arc;

use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use storybook_core::clock::Clock;
use storybook_core::fetch::ImageFetcher;
use storybook_core::filename::suggested_filename;
use storybook_core::image_ref::ImageRef;
use storybook_core::story::Story;
use tracing::{debug, info, instrument};

use crate::canvas::{Align, FONT_NAME, PANEL_STATE_NAME, PageCanvas};
use crate::error::PdfError;
use crate::layout::{
    BODY_FONT_SIZE, BODY_LINE_HEIGHT, FAILED_CAPTION_SIZE, FAILED_IMAGE_CAPTION, INK, MARGIN,
    MOCK_CAPTION_SIZE, MOCK_IMAGE_CAPTION, MUTED, PAGE_HEIGHT, PAGE_NUMBER_FONT_SIZE, PAGE_WIDTH,
    PANEL_BORDER, PANEL_FILL_OPACITY, PANEL_PADDING, PANEL_RADIUS, PLACEHOLDER_FILL,
    SheetLayout, TITLE_FONT_SIZE, TITLE_LINE_HEIGHT,
};
use crate::raster::{self, Illustration};
use crate::text::{self, ASCENT};

/// Title drawn when the story's own title is empty.
const FALLBACK_TITLE: &str = "Story";

const PRODUCER: &str = concat!("storybook-pdf ", env!("CARGO_PKG_VERSION"));

/// Knobs that differ between deployments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblerConfig {
    /// Whether a non-URL image reference may be read from the local
    /// filesystem. Off by default: a web request must not name server files.
    pub allow_local_paths: bool,
}

/// A finished document and its suggested download name.
#[derive(Debug, Clone)]
pub struct RenderedPdf {
    /// Serialized PDF.
    pub bytes: Vec<u8>,
    /// Sanitized `<title>.pdf`.
    pub filename: String,
    /// Number of sheets in the document.
    pub page_count: usize,
}

/// Renders stories into PDF documents, one sheet per story page.
///
/// Holds no per-document state; each call to [`StoryAssembler::assemble`]
/// builds a fresh document, so one assembler can serve concurrent requests.
#[derive(Clone)]
pub struct StoryAssembler {
    fetcher: Arc<dyn ImageFetcher>,
    clock: Arc<dyn Clock>,
    config: AssemblerConfig,
}

impl StoryAssembler {
    /// Creates an assembler with the default configuration.
    #[must_use]
    pub fn new(fetcher: Arc<dyn ImageFetcher>, clock: Arc<dyn Clock>) -> Self {
        Self {
            fetcher,
            clock,
            config: AssemblerConfig::default(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: AssemblerConfig) -> Self {
        self.config = config;
        self
    }

    /// Renders `story`. Page images are resolved strictly in page order, one
    /// at a time, before any sheet is drawn.
    ///
    /// The story is assumed to be validated already. Image failures never
    /// abort the document.
    ///
    /// # Errors
    ///
    /// Returns `PdfError` only if a content stream cannot be encoded or the
    /// document cannot be serialized.
    #[instrument(skip_all, fields(title = %story.title, pages = story.pages.len()))]
    pub async fn assemble(&self, story: &Story) -> Result<RenderedPdf, PdfError> {
        let mut illustrations = Vec::with_capacity(story.pages.len());
        for (index, page) in story.pages.iter().enumerate() {
            let page_number = index + 1;
            let reference = ImageRef::classify(page.image_url.as_deref());
            debug!(page = page_number, kind = reference.kind(), "resolving illustration");

            illustrations.push(
                raster::resolve(
                    reference,
                    page_number,
                    self.fetcher.as_ref(),
                    self.config.allow_local_paths,
                )
                .await,
            );
        }

        // Nothing below awaits; the document is built in one synchronous pass.
        let (bytes, page_count) = self.render(story, illustrations)?;
        info!(page_count, bytes = bytes.len(), "story assembled");

        Ok(RenderedPdf {
            bytes,
            filename: suggested_filename(&story.title),
            page_count,
        })
    }

    fn render(
        &self,
        story: &Story,
        illustrations: Vec<Illustration>,
    ) -> Result<(Vec<u8>, usize), PdfError> {
        let mut document = Document::with_version("1.5");
        let pages_id = document.new_object_id();
        let resources = shared_resources(&mut document);

        let title = if story.title.is_empty() {
            FALLBACK_TITLE
        } else {
            story.title.as_str()
        };

        let mut page_ids = Vec::with_capacity(story.pages.len().max(1));
        for (index, (page, illustration)) in story.pages.iter().zip(illustrations).enumerate() {
            let page_number = index + 1;
            let layout = SheetLayout::for_page(index, title);
            let mut canvas = PageCanvas::new(&mut document);
            draw_sheet(&mut canvas, &layout, illustration, &page.text, page_number);
            let (operations, xobjects) = canvas.finish();

            page_ids.push(write_page(
                &mut document,
                pages_id,
                &resources,
                operations,
                xobjects,
                page_number,
            )?);
        }

        // A story without pages still yields the document's initial sheet.
        if page_ids.is_empty() {
            page_ids.push(write_page(
                &mut document,
                pages_id,
                &resources,
                Vec::new(),
                Dictionary::new(),
                1,
            )?);
        }

        let page_count = page_ids.len();
        let bytes = self.finish(document, pages_id, page_ids, title)?;
        Ok((bytes, page_count))
    }

    fn finish(
        &self,
        mut document: Document,
        pages_id: ObjectId,
        page_ids: Vec<ObjectId>,
        title: &str,
    ) -> Result<Vec<u8>, PdfError> {
        #[allow(clippy::cast_possible_wrap)]
        let count = page_ids.len() as i64;
        let kids: Vec<Object> = page_ids.into_iter().map(Object::Reference).collect();
        document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let created = self.clock.now().format("D:%Y%m%d%H%M%SZ").to_string();
        let info_id = document.add_object(dictionary! {
            "Title" => Object::string_literal(text::encode_text_string(title)),
            "Producer" => Object::string_literal(PRODUCER),
            "CreationDate" => Object::string_literal(created),
        });
        document.trailer.set("Root", catalog_id);
        document.trailer.set("Info", info_id);

        document.compress();

        let mut bytes = Vec::new();
        document
            .save_to(&mut bytes)
            .map_err(|e| PdfError::Serialize(e.to_string()))?;
        Ok(bytes)
    }
}

/// Font and graphics-state resources shared by every sheet.
fn shared_resources(document: &mut Document) -> Dictionary {
    let font_id = document.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let panel_state_id = document.add_object(dictionary! {
        "Type" => "ExtGState",
        "ca" => PANEL_FILL_OPACITY,
        "CA" => 1.0_f32,
    });

    let mut fonts = Dictionary::new();
    fonts.set(FONT_NAME, font_id);
    let mut states = Dictionary::new();
    states.set(PANEL_STATE_NAME, panel_state_id);

    dictionary! {
        "Font" => fonts,
        "ExtGState" => states,
    }
}

fn write_page(
    document: &mut Document,
    pages_id: ObjectId,
    shared: &Dictionary,
    operations: Vec<lopdf::content::Operation>,
    xobjects: Dictionary,
    page_number: usize,
) -> Result<ObjectId, PdfError> {
    let content = Content { operations }
        .encode()
        .map_err(|e| PdfError::Encode {
            page: page_number,
            message: e.to_string(),
        })?;
    let content_id = document.add_object(Stream::new(Dictionary::new(), content));

    let mut resources = shared.clone();
    if !xobjects.is_empty() {
        resources.set("XObject", xobjects);
    }

    let media_box: Vec<Object> = vec![
        0.0_f32.into(),
        0.0_f32.into(),
        PAGE_WIDTH.into(),
        PAGE_HEIGHT.into(),
    ];
    Ok(document.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => media_box,
        "Contents" => content_id,
        "Resources" => resources,
    }))
}

/// Draws one sheet: title (first sheet only), illustration, text panel, and
/// page number, in that order.
fn draw_sheet(
    canvas: &mut PageCanvas<'_>,
    layout: &SheetLayout,
    illustration: Illustration,
    page_text: &str,
    page_number: usize,
) {
    for (line_index, line) in layout.title_lines.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let baseline =
            MARGIN + TITLE_FONT_SIZE * ASCENT + line_index as f32 * TITLE_LINE_HEIGHT;
        canvas.text_line(
            line,
            PAGE_WIDTH / 2.0,
            baseline,
            TITLE_FONT_SIZE,
            INK,
            Align::Center,
        );
    }

    match illustration {
        Illustration::Raster(raster) => canvas.image(raster, layout.image),
        Illustration::MockPlaceholder => {
            canvas.fill_rect(layout.image, PLACEHOLDER_FILL);
            canvas.centered_caption(MOCK_IMAGE_CAPTION, layout.image, MOCK_CAPTION_SIZE, MUTED);
        }
        Illustration::FailedPlaceholder => {
            canvas.fill_rect(layout.image, PLACEHOLDER_FILL);
            canvas.centered_caption(
                FAILED_IMAGE_CAPTION,
                layout.image,
                FAILED_CAPTION_SIZE,
                MUTED,
            );
        }
        Illustration::Blank => {}
    }

    canvas.panel(layout.panel, PANEL_RADIUS, INK, PANEL_BORDER);

    // Overflowing text runs past the panel; it is never truncated.
    let inner_width = layout.panel.width - 2.0 * PANEL_PADDING;
    for (line_index, line) in text::wrap(page_text, inner_width, BODY_FONT_SIZE)
        .iter()
        .enumerate()
    {
        #[allow(clippy::cast_precision_loss)]
        let baseline = layout.panel.y
            + PANEL_PADDING
            + BODY_FONT_SIZE * ASCENT
            + line_index as f32 * BODY_LINE_HEIGHT;
        canvas.text_line(
            line,
            layout.panel.x + PANEL_PADDING,
            baseline,
            BODY_FONT_SIZE,
            INK,
            Align::Left,
        );
    }

    canvas.text_line(
        &page_number.to_string(),
        PAGE_WIDTH - MARGIN,
        PAGE_HEIGHT - MARGIN,
        PAGE_NUMBER_FONT_SIZE,
        MUTED,
        Align::Right,
    );
}
