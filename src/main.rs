//! Minutes-Harvester main entry point
//!
//! This is the command-line interface for the council-minutes crawler and its
//! OCR and sparse-text helpers.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use minutes_harvester::config::{
    load_config_with_hash, ocr_api_key, validate, validate_ocr_settings, Config,
};
use minutes_harvester::crawler::run_crawl;
use minutes_harvester::ocr::{MistralAdapter, MistralOcrClient, OcrRunner, RetryPolicy};
use minutes_harvester::output::{find_sparse_texts, print_report, DEFAULT_MIN_LINES};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Minutes-Harvester: a council-minutes crawler
///
/// Crawls one municipal website for council-meeting PDF minutes, downloads
/// those inside a year window, extracts their text and keeps a resumable
/// CSV index of every PDF link seen.
#[derive(Parser, Debug)]
#[command(name = "minutes-harvester")]
#[command(version = "1.0.0")]
#[command(about = "Crawls a municipal website for council-meeting minutes", long_about = None)]
struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(long, global = true, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl the site and download minutes
    Crawl(CrawlArgs),

    /// OCR every PDF of a directory
    Ocr {
        /// Directory of input PDFs
        #[arg(long)]
        pdf_dir: PathBuf,

        /// Directory for the text files and ocr_log.csv
        #[arg(long)]
        out_dir: PathBuf,
    },

    /// List text files with fewer than N non-empty lines
    Sparse {
        /// Directory of text files
        #[arg(long)]
        txt_dir: PathBuf,

        /// Threshold of non-empty lines
        #[arg(long, default_value_t = DEFAULT_MIN_LINES)]
        min_lines: usize,
    },
}

#[derive(Args, Debug)]
struct CrawlArgs {
    /// Start URLs; the first one fixes the crawl domain
    #[arg(long, num_args = 1.., value_name = "URL")]
    start_urls: Vec<String>,

    /// Output directory for pdf/, txt/ and index.csv
    #[arg(long)]
    out_dir: Option<String>,

    /// First year to download (inclusive)
    #[arg(long)]
    from_year: Option<i32>,

    /// Last year to download (inclusive)
    #[arg(long)]
    to_year: Option<i32>,

    /// Maximum number of page fetches
    #[arg(long)]
    max_pages: Option<usize>,

    /// Re-attempt indexed entries that never produced a PDF
    #[arg(long)]
    retry_failed: bool,

    /// Validate settings and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_settings(cli.config.as_ref())?;

    match cli.command {
        Command::Crawl(args) => handle_crawl(config, args).await,
        Command::Ocr { pdf_dir, out_dir } => handle_ocr(&config, pdf_dir, out_dir).await,
        Command::Sparse { txt_dir, min_lines } => handle_sparse(txt_dir, min_lines),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("minutes_harvester=info,warn"),
            1 => EnvFilter::new("minutes_harvester=debug,info"),
            2 => EnvFilter::new("minutes_harvester=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file if one was given, defaults otherwise
fn load_settings(path: Option<&PathBuf>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);
    Ok(config)
}

/// Applies command-line flags over the file configuration
fn apply_overrides(config: &mut Config, args: &CrawlArgs) {
    let crawler = &mut config.crawler;
    if !args.start_urls.is_empty() {
        crawler.start_urls = args.start_urls.clone();
    }
    if let Some(out_dir) = &args.out_dir {
        crawler.out_dir = out_dir.clone();
    }
    if let Some(from_year) = args.from_year {
        crawler.from_year = from_year;
    }
    if let Some(to_year) = args.to_year {
        crawler.to_year = to_year;
    }
    if let Some(max_pages) = args.max_pages {
        crawler.max_pages = max_pages;
    }
    if args.retry_failed {
        crawler.retry_failed = true;
    }
}

/// Handles the crawl subcommand
async fn handle_crawl(mut config: Config, args: CrawlArgs) -> Result<()> {
    apply_overrides(&mut config, &args);
    validate(&config).context("Invalid crawl settings")?;

    if args.dry_run {
        print_dry_run(&config);
        return Ok(());
    }

    tracing::info!(
        "Crawling {} seed URLs into {} (years {}-{})",
        config.crawler.start_urls.len(),
        config.crawler.out_dir,
        config.crawler.from_year,
        config.crawler.to_year
    );

    let report = run_crawl(&config).await.context("Crawl failed")?;
    print_report(&report);
    Ok(())
}

/// Prints the effective crawl settings
fn print_dry_run(config: &Config) {
    let crawler = &config.crawler;

    println!("=== Minutes-Harvester Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Output directory: {}", crawler.out_dir);
    println!("  Year window: {}-{}", crawler.from_year, crawler.to_year);
    println!("  Max pages: {}", crawler.max_pages);
    println!("  Page timeout: {}s", crawler.page_timeout_secs);
    println!("  PDF timeout: {}s", crawler.pdf_timeout_secs);
    println!("  Retry failed entries: {}", crawler.retry_failed);

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\nStart URLs ({}):", crawler.start_urls.len());
    for url in &crawler.start_urls {
        println!("  - {}", url);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the ocr subcommand
async fn handle_ocr(config: &Config, pdf_dir: PathBuf, out_dir: PathBuf) -> Result<()> {
    validate_ocr_settings(config).context("Invalid OCR settings")?;

    if !pdf_dir.is_dir() {
        anyhow::bail!("PDF directory not found: {}", pdf_dir.display());
    }

    let api_key = ocr_api_key().context("The OCR service needs an API key")?;
    let client = MistralOcrClient::new(&config.ocr, &config.user_agent, api_key)?;
    let runner = OcrRunner::new(client, MistralAdapter, RetryPolicy::from_config(&config.ocr));

    let summary = runner.run(&pdf_dir, &out_dir).await?;
    println!(
        "OCR: {} written, {} skipped (already present), {} failed",
        summary.written, summary.skipped, summary.failed
    );
    Ok(())
}

/// Handles the sparse subcommand
fn handle_sparse(txt_dir: PathBuf, min_lines: usize) -> Result<()> {
    let sparse = find_sparse_texts(&txt_dir, min_lines)?;

    if sparse.is_empty() {
        println!("No text file with fewer than {} non-empty lines", min_lines);
        return Ok(());
    }

    println!("Text files with fewer than {} non-empty lines:", min_lines);
    for file in &sparse {
        println!(
            " - {} ({} non-empty lines)",
            file.path.display(),
            file.non_empty_lines
        );
    }
    Ok(())
}
