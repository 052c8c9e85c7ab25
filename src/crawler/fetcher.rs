//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with a descriptive user agent string
//! - GET requests for HTML pages
//! - GET requests for PDF documents
//! - Error classification
//!
//! Redirects are followed by the client; callers check where they ended up.
//! There is no retry: a failed request is reported once and the crawl moves on.

use crate::config::UserAgentConfig;
use crate::index::FetchStatus;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Result of fetching a page
#[derive(Debug)]
pub enum PageFetch {
    /// Successfully fetched an HTML page
    Success {
        /// Final URL after redirects
        final_url: Url,
        /// HTTP status code
        status_code: u16,
        /// Content-Type header value
        content_type: String,
        /// Page body content
        body: String,
    },

    /// Page is not HTML (Content-Type mismatch)
    ContentMismatch {
        /// The actual Content-Type received
        content_type: String,
    },

    /// Any status other than 200
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// Result of downloading a PDF candidate
#[derive(Debug)]
pub enum PdfFetch {
    /// 200 with a PDF content type
    Pdf {
        /// Raw document bytes
        bytes: Vec<u8>,
    },

    /// A response arrived but it is not a usable PDF
    Rejected {
        /// The HTTP status code
        status_code: u16,
        /// Content-Type header value, empty when absent
        content_type: String,
    },

    /// No usable response
    NetworkError {
        /// Error description
        error: String,
    },
}

impl PdfFetch {
    /// Value recorded in the `http_status` column
    pub fn status(&self) -> FetchStatus {
        match self {
            Self::Pdf { .. } => FetchStatus::Http(200),
            Self::Rejected { status_code, .. } => FetchStatus::Http(*status_code),
            Self::NetworkError { error } => FetchStatus::Error(error.clone()),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use minutes_harvester::config::UserAgentConfig;
/// use minutes_harvester::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "CouncilMinutesCrawler".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact: "non-commercial".to_string(),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    // Per-request timeouts are set by the callers (pages and PDFs differ)
    Client::builder()
        .user_agent(config.header_value())
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches an HTML page
///
/// | Condition | Result |
/// |-----------|--------|
/// | 200 with `text/html` | `Success` |
/// | 200 with another type | `ContentMismatch` |
/// | Any other status | `HttpError` |
/// | Timeout, DNS, reset | `NetworkError` |
pub async fn fetch_page(client: &Client, url: &Url, timeout: Duration) -> PageFetch {
    let response = match client.get(url.as_str()).timeout(timeout).send().await {
        Ok(response) => response,
        Err(e) => {
            return PageFetch::NetworkError {
                error: describe_error(&e),
            }
        }
    };

    let status = response.status();
    if status != StatusCode::OK {
        return PageFetch::HttpError {
            status_code: status.as_u16(),
        };
    }

    let final_url = response.url().clone();
    let content_type = content_type_of(&response);

    if !content_type.to_ascii_lowercase().contains("text/html") {
        return PageFetch::ContentMismatch { content_type };
    }

    match response.text().await {
        Ok(body) => PageFetch::Success {
            final_url,
            status_code: status.as_u16(),
            content_type,
            body,
        },
        Err(e) => PageFetch::NetworkError {
            error: describe_error(&e),
        },
    }
}

/// Downloads a PDF candidate
///
/// Only a 200 whose Content-Type starts with `application/pdf` counts as a
/// document; servers that answer with an HTML error page are rejected.
pub async fn fetch_pdf(client: &Client, url: &Url, timeout: Duration) -> PdfFetch {
    let response = match client.get(url.as_str()).timeout(timeout).send().await {
        Ok(response) => response,
        Err(e) => {
            return PdfFetch::NetworkError {
                error: describe_error(&e),
            }
        }
    };

    let status_code = response.status().as_u16();
    let content_type = content_type_of(&response);

    if status_code != 200
        || !content_type
            .to_ascii_lowercase()
            .starts_with("application/pdf")
    {
        return PdfFetch::Rejected {
            status_code,
            content_type,
        };
    }

    match response.bytes().await {
        Ok(bytes) => PdfFetch::Pdf {
            bytes: bytes.to_vec(),
        },
        Err(e) => PdfFetch::NetworkError {
            error: describe_error(&e),
        },
    }
}

fn content_type_of(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .trim()
        .to_string()
}

fn describe_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        "Connection refused".to_string()
    } else if e.is_redirect() {
        "Too many redirects".to_string()
    } else {
        e.to_string()
    }
}
