//! Directory-level OCR driver with a CSV log

use crate::ocr::{OcrError, OcrResponseAdapter, OcrService, RetryPolicy};
use crate::HarvestError;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Log written next to the OCR output
pub const OCR_LOG_FILE_NAME: &str = "ocr_log.csv";

/// Error messages are cut to this many characters in the log
const MAX_LOG_ERROR: usize = 500;

/// One line of `ocr_log.csv`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OcrLogRow {
    pub pdf: String,
    pub txt: String,
    pub status: String,
    pub pages: Option<usize>,
    pub error: String,
}

/// What happened to one PDF
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OcrOutcome {
    Written { pages: usize },
    /// A non-empty text file was already there
    SkippedExists,
    Failed(String),
}

impl OcrOutcome {
    fn log_row(&self, pdf: &Path, txt: &Path) -> OcrLogRow {
        let (status, pages, error) = match self {
            Self::Written { pages } => ("OK", Some(*pages), String::new()),
            Self::SkippedExists => ("SKIPPED_EXISTS", None, String::new()),
            Self::Failed(error) => ("ERROR", Some(0), error.chars().take(MAX_LOG_ERROR).collect()),
        };
        OcrLogRow {
            pdf: pdf.display().to_string(),
            txt: txt.display().to_string(),
            status: status.to_string(),
            pages,
            error,
        }
    }
}

/// Totals for one OCR run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OcrSummary {
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Runs OCR over every `*.pdf` of a directory
pub struct OcrRunner<S: OcrService, A: OcrResponseAdapter> {
    service: S,
    adapter: A,
    retry: RetryPolicy,
}

impl<S: OcrService, A: OcrResponseAdapter> OcrRunner<S, A> {
    pub fn new(service: S, adapter: A, retry: RetryPolicy) -> Self {
        Self {
            service,
            adapter,
            retry,
        }
    }

    /// Processes `pdf_dir/*.pdf` in name order into `out_dir/<stem>.txt`
    ///
    /// Documents are independent: a failure is logged and the run moves on.
    /// A missing input directory is the only input error that aborts.
    pub async fn run(&self, pdf_dir: &Path, out_dir: &Path) -> Result<OcrSummary, HarvestError> {
        if !pdf_dir.is_dir() {
            return Err(HarvestError::MissingInput(pdf_dir.display().to_string()));
        }
        tokio::fs::create_dir_all(out_dir).await?;

        let pdfs = list_pdfs(pdf_dir)?;
        let mut summary = OcrSummary::default();
        if pdfs.is_empty() {
            tracing::info!("No PDF found in {}", pdf_dir.display());
            return Ok(summary);
        }

        let mut log = csv::Writer::from_path(out_dir.join(OCR_LOG_FILE_NAME)).map_err(OcrError::from)?;

        for (i, pdf) in pdfs.iter().enumerate() {
            let stem = pdf
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("document");
            let txt_path = out_dir.join(format!("{}.txt", stem));

            tracing::info!("OCR {}/{}: {}", i + 1, pdfs.len(), pdf.display());
            let outcome = self.process_one(pdf, &txt_path, out_dir).await;

            match &outcome {
                OcrOutcome::Written { pages } => {
                    tracing::debug!("Wrote {} ({} pages)", txt_path.display(), pages);
                    summary.written += 1;
                }
                OcrOutcome::SkippedExists => {
                    tracing::debug!("Skipping {}: text already present", pdf.display());
                    summary.skipped += 1;
                }
                OcrOutcome::Failed(error) => {
                    tracing::warn!("OCR failed for {}: {}", pdf.display(), error);
                    summary.failed += 1;
                }
            }

            log.serialize(outcome.log_row(pdf, &txt_path))
                .map_err(OcrError::from)?;
            log.flush()?;
        }

        tracing::info!(
            "OCR completed: {} written, {} skipped, {} failed",
            summary.written,
            summary.skipped,
            summary.failed
        );
        Ok(summary)
    }

    /// OCRs one PDF into `txt_path`
    ///
    /// On an unexpected response shape the raw body goes to
    /// `out_dir/<stem>.raw.json`.
    pub async fn process_one(&self, pdf: &Path, txt_path: &Path, out_dir: &Path) -> OcrOutcome {
        if let Ok(meta) = tokio::fs::metadata(txt_path).await {
            if meta.len() > 0 {
                return OcrOutcome::SkippedExists;
            }
        }

        let bytes = match tokio::fs::read(pdf).await {
            Ok(bytes) => bytes,
            Err(e) => return OcrOutcome::Failed(format!("Failed to read PDF: {}", e)),
        };

        let result = match self.retry.process(&self.service, &bytes).await {
            Ok(raw) => self.adapter.pages(&raw),
            Err(e) => Err(e),
        };

        let pages = match result {
            Ok(pages) => pages,
            Err(OcrError::UnexpectedShape { reason, raw }) => {
                let stem = pdf
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("document");
                let raw_path = out_dir.join(format!("{}.raw.json", stem));
                if let Err(e) = tokio::fs::write(&raw_path, raw).await {
                    tracing::warn!("Failed to write {}: {}", raw_path.display(), e);
                }
                return OcrOutcome::Failed(format!("Unexpected OCR response: {}", reason));
            }
            Err(e) => return OcrOutcome::Failed(e.to_string()),
        };

        match tokio::fs::write(txt_path, pages.concat()).await {
            Ok(()) => OcrOutcome::Written { pages: pages.len() },
            Err(e) => OcrOutcome::Failed(format!("Failed to write text: {}", e)),
        }
    }
}

/// `*.pdf` files directly under `dir`, sorted
fn list_pdfs(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut pdfs: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "pdf"))
        .collect();
    pdfs.sort();
    Ok(pdfs)
}
