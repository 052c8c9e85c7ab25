//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that ties the pieces together:
//! - Breadth-first traversal of one domain within a page budget
//! - Classifying anchors into pages to follow and PDF candidates
//! - Replaying candidates already in the index
//! - Year-window filtering, download and text extraction of new candidates
//! - Writing one index row per distinct candidate

use crate::config::{Config, CrawlerConfig};
use crate::crawler::fetcher::{fetch_page, fetch_pdf, PageFetch, PdfFetch};
use crate::crawler::parser::{parse_html, Anchor};
use crate::crawler::{build_http_client, CrawlState};
use crate::extract::{PdfTextExtractor, TextExtractor};
use crate::heuristics::{
    disambiguated_pdf_name, guess_date, local_pdf_name, matches_minutes_keywords, YearWindow,
};
use crate::index::{CsvIndex, FetchStatus, IndexRecord, IndexStore};
use crate::output::{CrawlReport, OutputLayout};
use crate::url::{classify_link, is_same_domain, normalize_url, LinkKind};
use crate::HarvestError;
use reqwest::Client;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use url::Url;

/// What to do with candidates already present in the index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplayPolicy {
    /// Replay every known row without a request
    #[default]
    All,
    /// Replay, except rows with no local PDF that the window now admits
    RetryIncomplete,
}

/// Run parameters for [`Crawler`]
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    pub out_dir: PathBuf,
    pub window: YearWindow,
    pub max_pages: usize,
    pub page_timeout: Duration,
    pub pdf_timeout: Duration,
    pub replay: ReplayPolicy,
}

impl CrawlOptions {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            out_dir: PathBuf::from(&config.out_dir),
            window: YearWindow::new(config.from_year, config.to_year),
            max_pages: config.max_pages,
            page_timeout: Duration::from_secs(config.page_timeout_secs),
            pdf_timeout: Duration::from_secs(config.pdf_timeout_secs),
            replay: if config.retry_failed {
                ReplayPolicy::RetryIncomplete
            } else {
                ReplayPolicy::All
            },
        }
    }
}

/// Main crawler structure
///
/// Generic over the index backend and the text extractor so tests can run
/// against [`crate::index::MemoryIndex`] and a canned extractor.
pub struct Crawler<S: IndexStore, E: TextExtractor> {
    client: Client,
    options: CrawlOptions,
    layout: OutputLayout,
    index: S,
    extractor: E,
    previous: HashMap<String, IndexRecord>,
    previous_order: Vec<String>,
    resolved: HashSet<String>,
    /// Local PDF file name -> URL it was written for
    claimed_names: HashMap<String, String>,
    report: CrawlReport,
}

impl<S: IndexStore, E: TextExtractor> Crawler<S, E> {
    pub fn new(client: Client, options: CrawlOptions, index: S, extractor: E) -> Self {
        let layout = OutputLayout::new(options.out_dir.clone());
        Self {
            client,
            options,
            layout,
            index,
            extractor,
            previous: HashMap::new(),
            previous_order: Vec::new(),
            resolved: HashSet::new(),
            claimed_names: HashMap::new(),
            report: CrawlReport::default(),
        }
    }

    pub fn into_index(self) -> S {
        self.index
    }

    /// Runs the crawl loop until the queue is empty or the page budget is spent
    ///
    /// Returns the traversal state as it was left, together with the report.
    /// Only output-directory and index I/O errors abort the run; everything
    /// that goes wrong with a single page or document is logged and recorded.
    pub async fn run(
        &mut self,
        mut state: CrawlState,
    ) -> Result<(CrawlState, CrawlReport), HarvestError> {
        self.layout.create().await?;
        self.load_previous()?;
        self.resolved.clear();
        self.report = CrawlReport::default();

        tracing::info!(
            "Starting crawl of {} ({} seeds, year window {}, budget {} pages)",
            state.domain(),
            state.pending_count(),
            self.options.window,
            self.options.max_pages
        );

        let start_time = Instant::now();

        while self.report.pages_fetched < self.options.max_pages {
            let url = match state.next_pending() {
                Some(url) => url,
                None => {
                    tracing::info!("Queue is empty, crawl complete");
                    break;
                }
            };

            if !is_same_domain(state.domain(), &url) {
                tracing::debug!("Skipping off-domain URL: {}", url);
                continue;
            }

            tracing::debug!("Processing URL: {}", url);
            self.report.pages_fetched += 1;
            self.process_page(&mut state, &url).await?;

            if self.report.pages_fetched % 10 == 0 {
                tracing::info!(
                    "Progress: {} pages fetched, {} queued, {} PDF candidates, {:.1?} elapsed",
                    self.report.pages_fetched,
                    state.pending_count(),
                    self.report.candidates,
                    start_time.elapsed()
                );
            }
        }

        if state.pending_count() > 0 {
            tracing::warn!(
                "Page budget of {} exhausted with {} pages still queued",
                self.options.max_pages,
                state.pending_count()
            );
        }

        let carried = self.carried_over();
        self.report.carried_over = carried.len();
        self.index.finish(&carried)?;

        self.report.log();
        Ok((state, self.report.clone()))
    }

    fn load_previous(&mut self) -> Result<(), HarvestError> {
        self.previous.clear();
        self.previous_order.clear();
        self.claimed_names.clear();

        for record in self.index.load()? {
            if !self.previous.contains_key(&record.url) {
                self.previous_order.push(record.url.clone());
            }
            let file_name = record
                .local_pdf
                .as_deref()
                .and_then(|p| Path::new(p).file_name())
                .and_then(|n| n.to_str());
            if let Some(name) = file_name {
                self.claimed_names.insert(name.to_string(), record.url.clone());
            }
            self.previous.insert(record.url.clone(), record);
        }

        if !self.previous.is_empty() {
            tracing::info!("Loaded {} entries from the existing index", self.previous.len());
        }
        Ok(())
    }

    /// Previous rows not met this run, kept flag following the current window
    fn carried_over(&self) -> Vec<IndexRecord> {
        self.previous_order
            .iter()
            .filter(|url| !self.resolved.contains(*url))
            .filter_map(|url| self.previous.get(url))
            .map(|record| {
                let mut record = record.clone();
                record.recompute_kept(&self.options.window);
                record
            })
            .collect()
    }

    /// Fetches one page, follows its links and resolves its PDF candidates
    async fn process_page(&mut self, state: &mut CrawlState, url: &Url) -> Result<(), HarvestError> {
        let fetch = fetch_page(&self.client, url, self.options.page_timeout).await;

        match fetch {
            PageFetch::Success {
                final_url,
                status_code,
                content_type,
                body,
            } => {
                if final_url != *url {
                    if !is_same_domain(state.domain(), &final_url) {
                        tracing::debug!("{} redirected off-domain to {}", url, final_url);
                        return Ok(());
                    }
                    state.mark_visited(&final_url);
                }

                let parsed = parse_html(&body, &final_url);
                tracing::debug!(
                    "Parsed {} (HTTP {}, {}, {}): {} links",
                    url,
                    status_code,
                    content_type,
                    parsed.title.as_deref().unwrap_or("untitled"),
                    parsed.anchors.len()
                );

                for anchor in parsed.anchors {
                    match classify_link(&anchor.url, state.domain()) {
                        LinkKind::PdfCandidate => self.resolve_candidate(&anchor, url).await?,
                        LinkKind::Page => {
                            state.enqueue(anchor.url);
                        }
                        LinkKind::OffDomain => {}
                    }
                }
            }

            PageFetch::ContentMismatch { content_type } => {
                tracing::debug!("Skipping {}: expected HTML, got {}", url, content_type);
                self.report.non_html_pages += 1;
            }

            PageFetch::HttpError { status_code } => {
                tracing::debug!("Skipping {}: HTTP {}", url, status_code);
                self.report.failed_pages += 1;
            }

            PageFetch::NetworkError { error } => {
                tracing::warn!("Failed to fetch {}: {}", url, error);
                self.report.failed_pages += 1;
            }
        }

        Ok(())
    }

    /// Produces the index row for a PDF link, once per link per run
    async fn resolve_candidate(&mut self, anchor: &Anchor, source_page: &Url) -> Result<(), HarvestError> {
        let key = anchor.url.as_str().to_string();
        if !self.resolved.insert(key.clone()) {
            return Ok(());
        }
        self.report.candidates += 1;

        if !matches_minutes_keywords(&key) && !matches_minutes_keywords(&anchor.text) {
            tracing::debug!("No minutes keyword in {} ({:?})", key, anchor.text);
        }

        let replay = self
            .previous
            .get(&key)
            .filter(|prev| !self.should_retry(prev))
            .cloned();

        let record = match replay {
            Some(mut record) => {
                tracing::debug!("Replaying indexed entry: {}", key);
                record.recompute_kept(&self.options.window);
                self.report.replayed += 1;
                record
            }
            None => self.resolve_new(anchor, source_page).await,
        };

        self.index.append(&record)?;
        Ok(())
    }

    fn should_retry(&self, previous: &IndexRecord) -> bool {
        self.options.replay == ReplayPolicy::RetryIncomplete
            && previous.is_incomplete(&self.options.window)
    }

    /// Dates, filters, downloads and extracts a candidate not replayed
    async fn resolve_new(&mut self, anchor: &Anchor, source_page: &Url) -> IndexRecord {
        let path = urlencoding::decode(anchor.url.path())
            .map(|p| p.into_owned())
            .unwrap_or_else(|_| anchor.url.path().to_string());
        let guessed = guess_date(&path).or_else(|| guess_date(&anchor.text));
        let kept = self.options.window.admits(guessed);

        let mut record = IndexRecord {
            url: anchor.url.as_str().to_string(),
            local_pdf: None,
            local_txt: None,
            http_status: String::new(),
            guessed_date: guessed.map(|d| d.format("%Y-%m-%d").to_string()),
            kept_by_year_filter: kept,
            title_or_anchor: anchor.text.clone(),
            source_page: source_page.as_str().to_string(),
        };

        if !kept {
            tracing::debug!(
                "Skipping {} dated {} (outside {})",
                record.url,
                record.guessed_date.as_deref().unwrap_or("?"),
                self.options.window
            );
            record.http_status = FetchStatus::SkippedByYearFilter.to_string();
            self.report.skipped_by_year += 1;
            return record;
        }

        let fetch = fetch_pdf(&self.client, &anchor.url, self.options.pdf_timeout).await;
        record.http_status = fetch.status().to_string();

        match fetch {
            PdfFetch::Pdf { bytes } => {
                let name = self.claim_pdf_name(&anchor.url);
                let pdf_path = self.layout.pdf_path(&name);

                match tokio::fs::write(&pdf_path, &bytes).await {
                    Ok(()) => {
                        tracing::debug!("Downloaded {} -> {}", record.url, pdf_path.display());
                        record.local_pdf = Some(pdf_path.display().to_string());
                        self.report.downloaded += 1;
                        self.extract_text(&name, bytes, &mut record).await;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to write {}: {}", pdf_path.display(), e);
                        self.report.download_failures += 1;
                    }
                }
            }

            PdfFetch::Rejected {
                status_code,
                content_type,
            } => {
                tracing::warn!(
                    "Not a PDF: {} (HTTP {}, {:?})",
                    record.url,
                    status_code,
                    content_type
                );
                self.report.download_failures += 1;
            }

            PdfFetch::NetworkError { error } => {
                tracing::warn!("Failed to download {}: {}", record.url, error);
                self.report.download_failures += 1;
            }
        }

        record
    }

    /// Local name for a download, suffixed when another URL owns the plain one
    fn claim_pdf_name(&mut self, url: &Url) -> String {
        let plain = local_pdf_name(url);
        let name = match self.claimed_names.get(&plain) {
            Some(owner) if owner != url.as_str() => {
                let name = disambiguated_pdf_name(&plain, url);
                tracing::debug!("{} already used by {}, writing {} as {}", plain, owner, url, name);
                name
            }
            _ => plain,
        };
        self.claimed_names.insert(name.clone(), url.as_str().to_string());
        name
    }

    /// Writes the text file paired with a downloaded PDF
    async fn extract_text(&mut self, pdf_name: &str, bytes: Vec<u8>, record: &mut IndexRecord) {
        let extraction = self.extractor.extract(bytes).await;

        if extraction.is_failure() {
            tracing::warn!("Text extraction failed for {}", pdf_name);
            self.report.extraction_failures += 1;
        }

        let Some(contents) = extraction.file_contents() else {
            tracing::debug!("No text layer in {}", pdf_name);
            return;
        };

        let txt_path = self.layout.txt_path_for(pdf_name);
        match tokio::fs::write(&txt_path, contents).await {
            Ok(()) => {
                record.local_txt = Some(txt_path.display().to_string());
                self.report.texts_written += 1;
            }
            Err(e) => tracing::warn!("Failed to write {}: {}", txt_path.display(), e),
        }
    }
}

/// Runs a crawl with the CSV index in `out_dir` and `pdf-extract`
///
/// # Example
///
/// ```no_run
/// use minutes_harvester::config::load_config;
/// use minutes_harvester::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("harvester.toml"))?;
/// let report = run_crawl(&config).await?;
/// println!("{}", report);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config) -> Result<CrawlReport, HarvestError> {
    let seeds = config
        .crawler
        .start_urls
        .iter()
        .map(|s| normalize_url(s))
        .collect::<Result<Vec<_>, _>>()?;
    let state = CrawlState::new(&seeds)?;

    let options = CrawlOptions::from_config(&config.crawler);
    let client = build_http_client(&config.user_agent)?;
    let index = CsvIndex::in_dir(&options.out_dir);

    let mut crawler = Crawler::new(client, options, index, PdfTextExtractor);
    let (_, report) = crawler.run(state).await?;
    Ok(report)
}
