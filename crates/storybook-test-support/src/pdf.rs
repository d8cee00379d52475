//! PDF inspection — re-parses rendered bytes so tests can assert on what
//! each sheet draws instead of comparing pixels.

use lopdf::content::Content;
use lopdf::{Document, Object};

/// What one sheet draws.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetSummary {
    /// Every `Tj` string on the sheet, in content-stream order.
    pub texts: Vec<String>,
    /// Number of `Do` (image `XObject`) paint operations.
    pub image_draws: usize,
    /// Number of rectangle fills (`re` followed by `f`).
    pub filled_rects: usize,
    /// `MediaBox` width and height.
    pub size: (f32, f32),
}

impl SheetSummary {
    /// Whether any text line on the sheet equals `needle` exactly.
    #[must_use]
    pub fn has_text(&self, needle: &str) -> bool {
        self.texts.iter().any(|t| t == needle)
    }
}

/// A parsed document.
#[derive(Debug, Clone, Default)]
pub struct PdfSummary {
    /// Sheets in page order.
    pub sheets: Vec<SheetSummary>,
    /// `Info` dictionary `Title`, decoded from UTF-16BE or Latin-1.
    pub title: Option<String>,
    /// `Info` dictionary `CreationDate`.
    pub creation_date: Option<String>,
    /// Width and height of every image `XObject` in the document.
    pub images: Vec<(i64, i64)>,
}

/// Parses `bytes` and summarizes every sheet.
///
/// # Panics
///
/// Panics if `bytes` is not a readable PDF; tests want the parse failure to
/// surface as a test failure.
#[must_use]
pub fn inspect_pdf(bytes: &[u8]) -> PdfSummary {
    let document = Document::load_mem(bytes).expect("rendered bytes should parse as a PDF");

    let sheets = document
        .get_pages()
        .into_values()
        .map(|page_id| {
            let raw = document
                .get_page_content(page_id)
                .expect("page content should be readable");
            let content = Content::decode(&raw).expect("page content should decode");
            let mut sheet = summarize_operations(&content);
            sheet.size = media_box(&document, page_id);
            sheet
        })
        .collect();

    let info = document
        .trailer
        .get(b"Info")
        .and_then(Object::as_reference)
        .and_then(|id| document.get_dictionary(id))
        .ok();
    let info_string = |key: &[u8]| {
        info.and_then(|dict| dict.get(key).ok())
            .and_then(|value| value.as_str().ok())
            .map(text_string)
    };

    let images = document
        .objects
        .values()
        .filter_map(|object| object.as_stream().ok())
        .filter(|stream| {
            stream
                .dict
                .get(b"Subtype")
                .and_then(Object::as_name)
                .is_ok_and(|name| name == b"Image")
        })
        .map(|stream| {
            let dimension = |key: &[u8]| {
                stream
                    .dict
                    .get(key)
                    .and_then(Object::as_i64)
                    .unwrap_or_default()
            };
            (dimension(b"Width"), dimension(b"Height"))
        })
        .collect();

    PdfSummary {
        sheets,
        title: info_string(b"Title"),
        creation_date: info_string(b"CreationDate"),
        images,
    }
}

fn summarize_operations(content: &Content) -> SheetSummary {
    let mut sheet = SheetSummary::default();
    let mut pending_rect = false;
    for operation in &content.operations {
        match operation.operator.as_str() {
            "Tj" => {
                if let Some(Object::String(bytes, _)) = operation.operands.first() {
                    sheet.texts.push(latin1(bytes));
                }
            }
            "Do" => sheet.image_draws += 1,
            "re" => pending_rect = true,
            "f" if pending_rect => {
                sheet.filled_rects += 1;
                pending_rect = false;
            }
            _ => {}
        }
    }
    sheet
}

fn media_box(document: &Document, page_id: lopdf::ObjectId) -> (f32, f32) {
    let number = |object: &Object| object.as_float().unwrap_or_default();
    document
        .get_dictionary(page_id)
        .and_then(|page| page.get(b"MediaBox"))
        .and_then(Object::as_array)
        .map(|bounds| match bounds.as_slice() {
            [x0, y0, x1, y1] => (number(x1) - number(x0), number(y1) - number(y0)),
            _ => (0.0, 0.0),
        })
        .unwrap_or_default()
}

/// Decodes a PDF text string: UTF-16BE when it starts with a byte order
/// mark, Latin-1 otherwise.
fn text_string(bytes: &[u8]) -> String {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        _ => latin1(bytes),
    }
}

fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}
