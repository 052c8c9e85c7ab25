use crate::UrlError;
use url::Url;

/// Tracking query parameters dropped during normalization
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
];

/// Parses and normalizes a URL string
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Accept only `http` and `https`
/// 3. Require a host
/// 4. Remove the fragment
/// 5. Remove tracking query parameters; everything else in the query is kept
///    exactly as written
///
/// Paths are left untouched: CMS pages frequently depend on their trailing
/// slash and the index is keyed by the exact document URL.
///
/// # Examples
///
/// ```
/// use minutes_harvester::url::normalize_url;
///
/// let url = normalize_url("https://Example.com/pv.pdf?utm_source=x#page=2").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/pv.pdf");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
    normalize_parsed(url)
}

/// Normalizes an already-parsed URL (see [`normalize_url`])
pub fn normalize_parsed(mut url: Url) -> Result<Url, UrlError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);

    if let Some(query) = url.query().map(str::to_owned) {
        // Segments are kept byte for byte; the query is only rewritten when a
        // tracking key has to go
        let segments: Vec<&str> = query.split('&').collect();
        let kept: Vec<&str> = segments
            .iter()
            .copied()
            .filter(|segment| !is_tracking_segment(segment))
            .collect();

        if kept.len() != segments.len() {
            let rebuilt = kept.join("&");
            if rebuilt.is_empty() {
                url.set_query(None);
            } else {
                url.set_query(Some(&rebuilt));
            }
        }
    }

    Ok(url)
}

fn is_tracking_segment(segment: &str) -> bool {
    let key = segment.split('=').next().unwrap_or_default();
    TRACKING_PARAMS
        .iter()
        .any(|param| key.eq_ignore_ascii_case(param))
}
