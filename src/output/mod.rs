//! Output module for the on-disk layout and run summaries
//!
//! This module handles:
//! - The `pdf/` and `txt/` directories under the output root
//! - The per-run crawl report
//! - Scanning extracted texts for near-empty files

mod sparse;
pub mod stats;

pub use sparse::{count_non_empty_lines, find_sparse_texts, SparseText, DEFAULT_MIN_LINES};
pub use stats::{print_report, CrawlReport};

use std::path::{Path, PathBuf};

/// Directories a crawl writes into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub root: PathBuf,
    pub pdf_dir: PathBuf,
    pub txt_dir: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            pdf_dir: root.join("pdf"),
            txt_dir: root.join("txt"),
            root,
        }
    }

    /// Creates the output root and its `pdf/` and `txt/` subdirectories
    pub async fn create(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.pdf_dir).await?;
        tokio::fs::create_dir_all(&self.txt_dir).await
    }

    pub fn pdf_path(&self, name: &str) -> PathBuf {
        self.pdf_dir.join(name)
    }

    /// Text file paired with a PDF: same stem, `.txt` extension
    pub fn txt_path_for(&self, pdf_name: &str) -> PathBuf {
        let stem = Path::new(pdf_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(pdf_name);
        self.txt_dir.join(format!("{}.txt", stem))
    }
}
