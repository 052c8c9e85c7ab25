//! Minutes-Harvester: a council-minutes crawler
//!
//! This crate crawls a single municipal website for council-meeting PDF minutes,
//! downloads the ones that fall inside a year window, extracts their text and keeps
//! a resumable CSV index of every PDF link it has ever seen.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod heuristics;
pub mod index;
pub mod ocr;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for Minutes-Harvester operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Index error: {0}")]
    Index(#[from] index::IndexError),

    #[error("OCR error: {0}")]
    Ocr(#[from] ocr::OcrError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input directory not found: {0}")]
    MissingInput(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Missing environment variable: {0}")]
    MissingEnv(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Minutes-Harvester operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlState, Crawler};
pub use heuristics::{guess_date, sanitize_filename, YearWindow};
pub use index::IndexRecord;
pub use url::{extract_domain, normalize_url, LinkKind};
