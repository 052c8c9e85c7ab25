//! Client side of the OCR service
//!
//! Scanned PDFs have no text layer, so their `.txt` from the crawl is empty
//! or nearly so. This module sends whole PDFs to a remote OCR service and
//! writes one text file per document:
//! - [`OcrService`] is the transport, [`MistralOcrClient`] the real one
//! - [`OcrResponseAdapter`] turns a raw response into [`OcrPages`]
//! - [`OcrRunner`] walks a directory, skipping documents already done, and
//!   keeps `ocr_log.csv`

mod adapter;
mod client;
mod runner;

pub use adapter::{MistralAdapter, OcrResponseAdapter};
pub use client::{pdf_data_url, MistralOcrClient, OcrService, RetryPolicy};
pub use runner::{OcrLogRow, OcrOutcome, OcrRunner, OcrSummary, OCR_LOG_FILE_NAME};

use thiserror::Error;

/// Separator placed between pages in the text output
pub const PAGE_BREAK: &str = "\n\n---\n\n";

/// OCR-specific errors
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OCR service returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected OCR response: {reason}")]
    UnexpectedShape {
        reason: String,
        /// Response body as received, kept for diagnosis
        raw: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Log error: {0}")]
    Csv(#[from] csv::Error),
}

impl OcrError {
    /// Errors worth another attempt: timeouts, dropped connections,
    /// rate limiting and server-side failures
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect() || e.is_request() || e.is_body(),
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Per-page text of one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OcrPages {
    pub pages: Vec<String>,
}

impl OcrPages {
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Joins the pages with [`PAGE_BREAK`]
    ///
    /// Each page is trimmed and so is the result; an empty page still
    /// produces its break so page numbers can be recovered.
    pub fn concat(&self) -> String {
        self.pages
            .iter()
            .map(|page| page.trim())
            .collect::<Vec<_>>()
            .join(PAGE_BREAK)
            .trim()
            .to_string()
    }
}
