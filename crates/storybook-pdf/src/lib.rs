//! Storybook PDF — renders a finished story into a printable document.
//!
//! Each story page becomes exactly one US Letter sheet: illustration on top,
//! a rounded text panel below, and the page number in the bottom-right
//! corner. Image problems never abort a document; they degrade to a blank
//! region or a captioned placeholder.

pub mod assembler;
mod canvas;
pub mod error;
pub mod fetch;
pub mod layout;
mod raster;
mod text;

pub use assembler::{AssemblerConfig, RenderedPdf, StoryAssembler};
pub use error::PdfError;
pub use fetch::HttpImageFetcher;
