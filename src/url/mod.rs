//! URL handling module for Minutes-Harvester
//!
//! This module provides URL normalization, domain extraction and the
//! page-versus-PDF classification of discovered links.

mod domain;
mod normalize;

pub use domain::{extract_domain, is_same_domain};
pub use normalize::{normalize_parsed, normalize_url};

use url::Url;

/// What the crawler should do with a discovered link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// Path ends in `.pdf`: resolved as a minutes candidate, whatever its host
    PdfCandidate,
    /// On-domain, non-PDF: explored as a page
    Page,
    /// Off-domain, non-PDF: ignored
    OffDomain,
}

/// Returns true if the URL path ends with the PDF extension (case-insensitive)
///
/// Query strings and fragments are not part of the path, so
/// `/files/pv.PDF?download=1` is a PDF link.
pub fn is_pdf_url(url: &Url) -> bool {
    url.path().to_ascii_lowercase().ends_with(".pdf")
}

/// Classifies a link against the crawl domain
///
/// PDF detection takes priority over the domain check: minutes are often
/// served from a separate media host that the pages themselves link to.
///
/// # Examples
///
/// ```
/// use minutes_harvester::url::{classify_link, LinkKind};
/// use url::Url;
///
/// let url = Url::parse("https://mairie.example.fr/docs/pv.pdf").unwrap();
/// assert_eq!(classify_link(&url, "mairie.example.fr"), LinkKind::PdfCandidate);
/// ```
pub fn classify_link(url: &Url, domain: &str) -> LinkKind {
    if is_pdf_url(url) {
        LinkKind::PdfCandidate
    } else if is_same_domain(domain, url) {
        LinkKind::Page
    } else {
        LinkKind::OffDomain
    }
}
