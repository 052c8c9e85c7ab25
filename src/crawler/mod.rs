//! Crawler module for traversal, fetching and candidate resolution
//!
//! This module contains the core crawling logic, including:
//! - Traversal state (visited set and FIFO queue)
//! - HTTP fetching of pages and PDFs
//! - HTML parsing and link extraction
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod state;

pub use coordinator::{run_crawl, CrawlOptions, Crawler, ReplayPolicy};
pub use fetcher::{build_http_client, fetch_page, fetch_pdf, PageFetch, PdfFetch};
pub use parser::{parse_html, Anchor, ParsedPage};
pub use state::CrawlState;
