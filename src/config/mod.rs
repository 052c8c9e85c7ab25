//! Configuration module for Minutes-Harvester
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Command-line flags are applied on top of it by the binary.
//!
//! # Example
//!
//! ```no_run
//! use minutes_harvester::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvester.toml")).unwrap();
//! println!("Years: {}-{}", config.crawler.from_year, config.crawler.to_year);
//! ```

mod env;
mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OcrConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::{validate, validate_ocr_settings};

pub use env::{ocr_api_key, OCR_API_KEY_VAR};
