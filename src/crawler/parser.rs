//! HTML parser for extracting links and their anchor texts
//!
//! This module handles parsing HTML content to extract:
//! - Every `<a href>` resolved to an absolute, normalized URL
//! - The anchor text, used as a fallback source for the meeting date
//! - The page title, for logging

use crate::url::normalize_parsed;
use scraper::{Html, Selector};
use url::Url;

/// A link found on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    /// Absolute, normalized target
    pub url: Url,
    /// Visible text with whitespace collapsed; may be empty
    pub text: String,
}

/// Extracted information from an HTML page
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// The page title (from <title> tag)
    pub title: Option<String>,

    /// All followable anchors, in document order
    pub anchors: Vec<Anchor>,
}

/// Parses HTML content and extracts anchors and the title
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` anywhere in the document, including `download` links
///
/// **Exclude:**
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Fragment-only links
/// - Anything that does not resolve to an HTTP(S) URL
///
/// # Example
///
/// ```
/// use minutes_harvester::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<html><head><title>Conseils</title></head>
///     <body><a href="/docs/CM_15mars2019.pdf">PV du 15 mars 2019</a></body></html>"#;
/// let base_url = Url::parse("https://mairie.example.fr/conseils/").unwrap();
/// let parsed = parse_html(html, &base_url);
/// assert_eq!(parsed.title, Some("Conseils".to_string()));
/// assert_eq!(parsed.anchors[0].url.as_str(), "https://mairie.example.fr/docs/CM_15mars2019.pdf");
/// assert_eq!(parsed.anchors[0].text, "PV du 15 mars 2019");
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        anchors: extract_anchors(&document, base_url),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| collapse_whitespace(&element.text().collect::<String>()))
        .filter(|s| !s.is_empty())
}

fn extract_anchors(document: &Html, base_url: &Url) -> Vec<Anchor> {
    let mut anchors = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };

            if let Some(url) = resolve_link(href, base_url) {
                let text = collapse_whitespace(&element.text().collect::<String>());
                anchors.push(Anchor { url, text });
            }
        }
    }

    anchors
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only links
/// - Invalid or non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    normalize_parsed(absolute).ok()
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
