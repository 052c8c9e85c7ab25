//! Per-run counters for a crawl
//!
//! The coordinator bumps these as it goes; at the end they are logged and
//! printed as the run summary.

use std::fmt;

/// What one crawl run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// Page fetch attempts, counted against the page budget
    pub pages_fetched: usize,

    /// Pages answered with a non-200 status or a network error
    pub failed_pages: usize,

    /// Pages that were not HTML
    pub non_html_pages: usize,

    /// Distinct PDF links seen this run (one index row each)
    pub candidates: usize,

    /// Candidates answered from the previous index without a request
    pub replayed: usize,

    /// PDFs written to disk
    pub downloaded: usize,

    /// Candidates dated outside the year window
    pub skipped_by_year: usize,

    /// Download attempts that produced no local file
    pub download_failures: usize,

    /// Text files written next to the PDFs
    pub texts_written: usize,

    /// PDFs whose text layer could not be read
    pub extraction_failures: usize,

    /// Previous index rows not seen this run and copied forward
    pub carried_over: usize,
}

impl CrawlReport {
    /// Rows the index holds after the run
    pub fn index_rows(&self) -> usize {
        self.candidates + self.carried_over
    }

    /// Emits the summary at `info`
    pub fn log(&self) {
        tracing::info!(
            "Crawl completed: {} pages fetched ({} failed, {} not HTML), {} PDF candidates",
            self.pages_fetched,
            self.failed_pages,
            self.non_html_pages,
            self.candidates
        );
        tracing::info!(
            "PDFs: {} replayed, {} downloaded, {} skipped by year filter, {} failed",
            self.replayed,
            self.downloaded,
            self.skipped_by_year,
            self.download_failures
        );
        tracing::info!(
            "Texts: {} written, {} extraction failures; index: {} rows ({} carried over)",
            self.texts_written,
            self.extraction_failures,
            self.index_rows(),
            self.carried_over
        );
    }
}

impl fmt::Display for CrawlReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Crawl Report ===")?;
        writeln!(f)?;
        writeln!(f, "Pages:")?;
        writeln!(f, "  Fetched: {}", self.pages_fetched)?;
        writeln!(f, "  Failed: {}", self.failed_pages)?;
        writeln!(f, "  Not HTML: {}", self.non_html_pages)?;
        writeln!(f)?;
        writeln!(f, "PDF candidates: {}", self.candidates)?;
        writeln!(f, "  Replayed from index: {}", self.replayed)?;
        writeln!(f, "  Downloaded: {}", self.downloaded)?;
        writeln!(f, "  Skipped by year filter: {}", self.skipped_by_year)?;
        writeln!(f, "  Download failures: {}", self.download_failures)?;
        writeln!(f)?;
        writeln!(f, "Texts written: {}", self.texts_written)?;
        writeln!(f, "Extraction failures: {}", self.extraction_failures)?;
        writeln!(f)?;
        write!(
            f,
            "Index rows: {} ({} carried over from earlier runs)",
            self.index_rows(),
            self.carried_over
        )
    }
}

/// Prints the report to stdout
pub fn print_report(report: &CrawlReport) {
    println!("{}", report);
}
