//! Shared test doubles, fixtures, and PDF inspection helpers for the
//! Storybook service.

mod clock;
mod fetcher;
mod fixtures;
mod generators;
mod pdf;

pub use clock::FixedClock;
pub use fetcher::StaticImageFetcher;
pub use fixtures::{
    jpeg_bytes, png_bytes, png_data_uri, rgba_png_bytes, sample_story, svg_data_uri,
};
pub use generators::{FailingImageGenerator, FailingStoryGenerator, RecordingImageGenerator};
pub use pdf::{PdfSummary, SheetSummary, inspect_pdf};
