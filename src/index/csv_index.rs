//! CSV backend for the index
//!
//! Rows of the current run go to `index.csv.partial` and are flushed one by
//! one; `finish` renames it over `index.csv`. A run killed halfway leaves the
//! previous `index.csv` intact plus a partial file, and the next `load`
//! merges both so that nothing already resolved is fetched twice.

use crate::index::{IndexRecord, IndexResult, IndexStore, INDEX_HEADER};
use csv::{Writer, WriterBuilder};
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

/// File name of the index inside the output directory
pub const INDEX_FILE_NAME: &str = "index.csv";

/// `index.csv` store
pub struct CsvIndex {
    path: PathBuf,
    partial_path: PathBuf,
    writer: Option<Writer<File>>,
}

impl CsvIndex {
    /// Creates a store for the given index file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut partial = path.clone().into_os_string();
        partial.push(".partial");

        Self {
            path,
            partial_path: PathBuf::from(partial),
            writer: None,
        }
    }

    /// Creates a store for `<out_dir>/index.csv`
    pub fn in_dir(out_dir: &Path) -> Self {
        Self::new(out_dir.join(INDEX_FILE_NAME))
    }

    fn writer(&mut self) -> IndexResult<&mut Writer<File>> {
        let writer = match self.writer.take() {
            Some(writer) => writer,
            None => {
                let mut writer = WriterBuilder::new()
                    .has_headers(false)
                    .from_path(&self.partial_path)?;
                writer.write_record(INDEX_HEADER)?;
                writer.flush()?;
                writer
            }
        };
        Ok(self.writer.insert(writer))
    }
}

impl IndexStore for CsvIndex {
    fn load(&mut self) -> IndexResult<Vec<IndexRecord>> {
        let mut rows: Vec<IndexRecord> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for source in [&self.path, &self.partial_path] {
            if !source.exists() {
                continue;
            }
            let records = read_index(source)?;
            tracing::debug!("Loaded {} index rows from {}", records.len(), source.display());

            for record in records {
                match positions.get(&record.url) {
                    Some(&pos) => rows[pos] = record,
                    None => {
                        positions.insert(record.url.clone(), rows.len());
                        rows.push(record);
                    }
                }
            }
        }

        Ok(rows)
    }

    fn append(&mut self, record: &IndexRecord) -> IndexResult<()> {
        let writer = self.writer()?;
        writer.serialize(record)?;
        writer.flush()?;
        Ok(())
    }

    fn finish(&mut self, carried_over: &[IndexRecord]) -> IndexResult<()> {
        let writer = self.writer()?;
        for record in carried_over {
            writer.serialize(record)?;
        }
        writer.flush()?;

        // Close before renaming
        self.writer = None;
        std::fs::rename(&self.partial_path, &self.path)?;
        Ok(())
    }
}

/// Reads every well-formed row of an index file
///
/// Malformed rows are logged and skipped so that one damaged line does not
/// make the whole history unusable.
pub fn read_index(path: &Path) -> IndexResult<Vec<IndexRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();

    for (line, result) in reader.deserialize::<IndexRecord>().enumerate() {
        match result {
            Ok(record) => records.push(record),
            Err(e) => tracing::warn!(
                "Skipping malformed row {} in {}: {}",
                line + 2,
                path.display(),
                e
            ),
        }
    }

    Ok(records)
}
