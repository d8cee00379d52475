//! Errors that abort a whole document.
//!
//! Per-page image failures are not represented here; they are recovered
//! inside the assembler.

use thiserror::Error;

/// A failure while building or serializing the output document.
#[derive(Debug, Error)]
pub enum PdfError {
    /// A page content stream could not be encoded.
    #[error("content encoding failed on page {page}: {message}")]
    Encode {
        /// 1-based page number.
        page: usize,
        /// Underlying encoder message.
        message: String,
    },

    /// The finished document could not be written out.
    #[error("document serialization failed: {0}")]
    Serialize(String),
}
