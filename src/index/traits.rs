//! Index store trait and error types

use crate::index::IndexRecord;
use thiserror::Error;

/// Errors that can occur while reading or writing the index
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for index operations
pub type IndexResult<T> = Result<T, IndexError>;

/// Persistence interface for index rows
///
/// A run calls `load` once, `append` once per resolved candidate, then
/// `finish` with the earlier rows that were not seen again.
pub trait IndexStore {
    /// Returns the rows left by previous runs, oldest first, one per URL
    fn load(&mut self) -> IndexResult<Vec<IndexRecord>>;

    /// Persists one row as soon as its candidate is resolved
    fn append(&mut self, record: &IndexRecord) -> IndexResult<()>;

    /// Adds the carried-over rows and makes the new index current
    fn finish(&mut self, carried_over: &[IndexRecord]) -> IndexResult<()>;
}
