//! PDF text extraction
//!
//! # Example
//! ```no_run
//! use shared_pdf::{PdfTextExtractor, TextExtractor, PdfError};
//!
//! fn read_delivery_note(pdf_bytes: &[u8]) -> Result<String, PdfError> {
//!     let text = PdfTextExtractor::new().extract_text(pdf_bytes)?;
//!     println!("Extracted {} characters", text.len());
//!     Ok(text)
//! }
//! ```

use std::panic;

use thiserror::Error;
use tracing::debug;

/// Errors raised while turning a document into text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PdfError {
    #[error("not a PDF document")]
    NotPdf,

    #[error("password-protected PDF")]
    PasswordProtected,

    #[error("invalid PDF: {0}")]
    InvalidPdf(String),

    #[error("text extraction failed: {0}")]
    ExtractionError(String),
}

/// A document-to-text capability.
///
/// Implementations return the text of each page in order. An unreadable
/// document is an error; a readable one without text yields empty pages.
pub trait TextExtractor: Send + Sync {
    fn name(&self) -> &'static str;

    fn extract_pages(&self, data: &[u8]) -> Result<Vec<String>, PdfError>;

    /// Concatenated text of all pages, each page followed by a newline.
    fn extract_text(&self, data: &[u8]) -> Result<String, PdfError> {
        let pages = self.extract_pages(data)?;
        Ok(join_pages(&pages))
    }
}

/// Join page texts the way the extraction rules expect: every non-empty page
/// is terminated by a newline.
pub fn join_pages<S: AsRef<str>>(pages: &[S]) -> String {
    let mut text = String::new();
    for page in pages {
        let page = page.as_ref();
        if page.is_empty() {
            continue;
        }
        text.push_str(page);
        text.push('\n');
    }
    text
}

/// Backend using pdf-extract
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }

    fn classify_error(message: String) -> PdfError {
        let lower = message.to_lowercase();

        if lower.contains("encrypted") || lower.contains("password") {
            return PdfError::PasswordProtected;
        }

        if lower.contains("invalid") || lower.contains("malformed") || lower.contains("corrupt") {
            return PdfError::InvalidPdf(message);
        }

        PdfError::ExtractionError(message)
    }
}

impl TextExtractor for PdfTextExtractor {
    fn name(&self) -> &'static str {
        "pdf-extract"
    }

    fn extract_pages(&self, data: &[u8]) -> Result<Vec<String>, PdfError> {
        if data.len() < 4 || &data[0..4] != b"%PDF" {
            return Err(PdfError::NotPdf);
        }

        // pdf-extract panics on some malformed inputs; keep that inside this document
        let text = panic::catch_unwind(|| pdf_extract::extract_text_from_mem(data))
            .map_err(|_| PdfError::ExtractionError("PDF parser aborted".to_string()))?
            .map_err(|e| Self::classify_error(e.to_string()))?;

        // pdf-extract separates pages with form feeds
        let pages: Vec<String> = text.split('\x0C').map(str::to_string).collect();
        debug!(pages = pages.len(), chars = text.len(), "extracted PDF text");

        Ok(pages)
    }
}
