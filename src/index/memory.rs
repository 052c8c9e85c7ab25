//! In-memory backend for the index, used to drive the crawler in tests

use crate::index::{IndexRecord, IndexResult, IndexStore};

/// Index kept in memory
///
/// `previous` is what `load` returns; `rows` collects what a run writes.
#[derive(Debug, Default, Clone)]
pub struct MemoryIndex {
    previous: Vec<IndexRecord>,
    rows: Vec<IndexRecord>,
    finished: bool,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from rows left by an earlier run
    pub fn with_records(previous: Vec<IndexRecord>) -> Self {
        Self {
            previous,
            ..Self::default()
        }
    }

    /// Rows written by the run so far (appended, then carried over)
    pub fn rows(&self) -> &[IndexRecord] {
        &self.rows
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Index a following run would start from
    pub fn next_run(&self) -> Self {
        Self::with_records(self.rows.clone())
    }
}

impl IndexStore for MemoryIndex {
    fn load(&mut self) -> IndexResult<Vec<IndexRecord>> {
        Ok(self.previous.clone())
    }

    fn append(&mut self, record: &IndexRecord) -> IndexResult<()> {
        self.rows.push(record.clone());
        Ok(())
    }

    fn finish(&mut self, carried_over: &[IndexRecord]) -> IndexResult<()> {
        self.rows.extend_from_slice(carried_over);
        self.finished = true;
        Ok(())
    }
}
