//! Index module for the resumable audit log of PDF candidates
//!
//! This module handles:
//! - The `IndexRecord` row written for every PDF link ever observed
//! - The `IndexStore` trait the crawler persists rows through
//! - A CSV backend (`index.csv`) and an in-memory backend for tests

mod csv_index;
mod memory;
mod traits;

pub use csv_index::{read_index, CsvIndex, INDEX_FILE_NAME};
pub use memory::MemoryIndex;
pub use traits::{IndexError, IndexResult, IndexStore};

use crate::heuristics::YearWindow;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Column names of `index.csv`, in order
pub const INDEX_HEADER: [&str; 8] = [
    "url",
    "local_pdf",
    "local_txt",
    "http_status",
    "guessed_date",
    "kept_by_year_filter",
    "title_or_anchor",
    "source_page",
];

/// One row of the index: a PDF candidate and what happened to it
///
/// Identity is the `url`. Rows loaded from a previous run are replayed as-is,
/// only `kept_by_year_filter` follows the current year window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRecord {
    pub url: String,
    pub local_pdf: Option<String>,
    pub local_txt: Option<String>,
    pub http_status: String,
    pub guessed_date: Option<String>,
    #[serde(with = "title_case_bool")]
    pub kept_by_year_filter: bool,
    pub title_or_anchor: String,
    pub source_page: String,
}

impl IndexRecord {
    /// Parses the stored date; accepts both `2019-03-15` and `2019-03-15T00:00:00`
    pub fn guessed_date(&self) -> Option<NaiveDate> {
        let raw = self.guessed_date.as_deref()?;
        let day = raw.get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }

    pub fn has_local_pdf(&self) -> bool {
        self.local_pdf.as_deref().is_some_and(|p| !p.is_empty())
    }

    /// Re-evaluates the year filter against the given window
    pub fn recompute_kept(&mut self, window: &YearWindow) {
        self.kept_by_year_filter = window.admits(self.guessed_date());
    }

    /// True if this entry never produced a local PDF but would be fetched now
    ///
    /// Covers failed downloads as well as entries skipped under a narrower
    /// window in an earlier run.
    pub fn is_incomplete(&self, window: &YearWindow) -> bool {
        !self.has_local_pdf() && window.admits(self.guessed_date())
    }
}

/// Outcome recorded in the `http_status` column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    /// An HTTP response arrived with this status code
    Http(u16),
    /// The request failed before a response (timeout, DNS, reset...)
    Error(String),
    /// The guessed date fell outside the year window; never fetched
    SkippedByYearFilter,
}

impl FetchStatus {
    pub const SKIPPED_BY_YEAR_FILTER: &'static str = "SKIPPED_BY_YEAR_FILTER";
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(code) => write!(f, "{}", code),
            Self::Error(message) => write!(f, "ERROR:{}", message),
            Self::SkippedByYearFilter => f.write_str(Self::SKIPPED_BY_YEAR_FILTER),
        }
    }
}

/// `True` / `False`, the spelling used by existing index files
mod title_case_bool {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "True" } else { "False" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" | "" => Ok(false),
            other => Err(de::Error::custom(format!("invalid boolean '{}'", other))),
        }
    }
}
