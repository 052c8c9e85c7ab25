use serde::Deserialize;

/// Main configuration structure for Minutes-Harvester
///
/// Every section is optional in the TOML file; missing keys fall back to the
/// defaults below and command-line flags are layered on top.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub ocr: OcrConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Pages listing the council meetings; the first one fixes the crawl domain
    #[serde(rename = "start-urls")]
    pub start_urls: Vec<String>,

    /// Root of the `pdf/`, `txt/` and `index.csv` outputs
    #[serde(rename = "out-dir")]
    pub out_dir: String,

    /// First year (inclusive) of documents to download
    #[serde(rename = "from-year")]
    pub from_year: i32,

    /// Last year (inclusive) of documents to download
    #[serde(rename = "to-year")]
    pub to_year: i32,

    /// Hard cap on page fetches for one run
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Timeout for HTML page fetches (seconds)
    #[serde(rename = "page-timeout-secs")]
    pub page_timeout_secs: u64,

    /// Timeout for PDF downloads (seconds)
    #[serde(rename = "pdf-timeout-secs")]
    pub pdf_timeout_secs: u64,

    /// Re-attempt indexed entries that never produced a local PDF
    #[serde(rename = "retry-failed")]
    pub retry_failed: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            start_urls: Vec::new(),
            out_dir: "data".to_string(),
            from_year: 2014,
            to_year: 2025,
            max_pages: 2000,
            page_timeout_secs: 20,
            pdf_timeout_secs: 60,
            retry_failed: false,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// Free-form contact or purpose note shown in the user agent
    pub contact: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "CouncilMinutesCrawler".to_string(),
            crawler_version: "1.0".to_string(),
            contact: "non-commercial".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version (+contact)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{})",
            self.crawler_name, self.crawler_version, self.contact
        )
    }
}

/// OCR service configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Endpoint of the OCR service
    #[serde(rename = "api-url")]
    pub api_url: String,

    /// Model name sent with each request
    pub model: String,

    /// Attempts before a document is given up on
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Base delay of the linear backoff (seconds)
    #[serde(rename = "backoff-secs")]
    pub backoff_secs: f64,

    /// Request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.mistral.ai/v1/ocr".to_string(),
            model: "mistral-ocr-latest".to_string(),
            max_retries: 5,
            backoff_secs: 2.0,
            timeout_secs: 300,
        }
    }
}
