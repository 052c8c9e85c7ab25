//! Embedded-text extraction from downloaded PDFs
//!
//! Extraction is best effort: a damaged or image-only PDF yields
//! [`Extraction::Failed`] or empty text, never an error that would stop the
//! crawl. Scanned documents are handled afterwards by the `ocr` module.

use async_trait::async_trait;

/// Marker written in place of text when extraction failed
pub const EXTRACTION_ERROR_MARKER: &str = "__PDF_TEXT_EXTRACTION_ERROR__";

/// Result of extracting text from one PDF
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Text layer read successfully; may be empty for scanned documents
    Extracted(String),
    /// The PDF could not be read
    Failed(String),
}

impl Extraction {
    /// Contents for the `.txt` file, or `None` when there is nothing to write
    ///
    /// Failures are written as the marker followed by the reason, which is
    /// what the downstream OCR and structuring steps look for.
    pub fn file_contents(&self) -> Option<String> {
        match self {
            Self::Extracted(text) if text.is_empty() => None,
            Self::Extracted(text) => Some(text.clone()),
            Self::Failed(reason) => Some(format!("{} {}", EXTRACTION_ERROR_MARKER, reason)),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Text extraction backend
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extracts the text layer of an in-memory PDF
    async fn extract(&self, pdf: Vec<u8>) -> Extraction;
}

/// `pdf-extract` backend
///
/// Parsing runs on the blocking pool; a panic inside the parser (it has a
/// few on malformed fonts) is reported as a failure.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextExtractor;

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract(&self, pdf: Vec<u8>) -> Extraction {
        let result =
            tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&pdf)).await;

        match result {
            Ok(Ok(text)) => Extraction::Extracted(text),
            Ok(Err(e)) => Extraction::Failed(e.to_string()),
            Err(e) if e.is_panic() => Extraction::Failed("PDF parser panicked".to_string()),
            Err(e) => Extraction::Failed(e.to_string()),
        }
    }
}
