//! Lists extracted text files that are nearly empty
//!
//! A PDF made of scanned pages has no text layer, so its `.txt` comes out
//! with a handful of lines (or only the extraction marker). These are the
//! documents to send to OCR.

use crate::HarvestError;
use std::path::{Path, PathBuf};

/// Default threshold for `sparse --min-lines`
pub const DEFAULT_MIN_LINES: usize = 5;

/// A text file under the threshold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparseText {
    pub path: PathBuf,
    /// Lines with something other than whitespace
    pub non_empty_lines: usize,
}

/// Counts lines that are not blank
pub fn count_non_empty_lines(text: &str) -> usize {
    text.lines().filter(|line| !line.trim().is_empty()).count()
}

/// Scans `txt_dir` (not recursively) for `.txt` files with fewer than
/// `min_lines` non-empty lines, sorted by path
///
/// Files that cannot be read are skipped with a warning.
pub fn find_sparse_texts(txt_dir: &Path, min_lines: usize) -> Result<Vec<SparseText>, HarvestError> {
    if !txt_dir.is_dir() {
        return Err(HarvestError::MissingInput(txt_dir.display().to_string()));
    }

    let mut paths: Vec<PathBuf> = std::fs::read_dir(txt_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
        })
        .collect();
    paths.sort();

    let mut sparse = Vec::new();
    for path in paths {
        // Extraction output may contain stray invalid UTF-8
        let text = match std::fs::read(&path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", path.display(), e);
                continue;
            }
        };

        let non_empty_lines = count_non_empty_lines(&text);
        if non_empty_lines < min_lines {
            sparse.push(SparseText {
                path,
                non_empty_lines,
            });
        }
    }

    Ok(sparse)
}
