use sha2::{Digest, Sha256};
use url::Url;

/// Upper bound on a local file name, in bytes
pub const MAX_FILENAME_BYTES: usize = 255;

/// Name used when a URL path yields nothing usable
const FALLBACK_NAME: &str = "document.pdf";

/// Hex digits of the URL digest in a disambiguated name
const DIGEST_SUFFIX_LEN: usize = 8;

/// Replaces unsafe characters and bounds the length of a file name
///
/// Every run of characters other than alphanumerics, `-`, `_` and `.`
/// becomes a single `_`; the result is cut to [`MAX_FILENAME_BYTES`] on a
/// character boundary. Sanitizing an already sanitized name returns it
/// unchanged.
///
/// # Examples
///
/// ```
/// use minutes_harvester::heuristics::sanitize_filename;
///
/// assert_eq!(sanitize_filename("docs/CM 15 mars.pdf"), "docs_CM_15_mars.pdf");
/// ```
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_unsafe_run = false;

    for c in name.chars() {
        if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
            out.push(c);
            in_unsafe_run = false;
        } else if !in_unsafe_run {
            out.push('_');
            in_unsafe_run = true;
        }
    }

    truncate_to_bytes(out, MAX_FILENAME_BYTES)
}

fn truncate_to_bytes(mut s: String, max: usize) -> String {
    if s.len() <= max {
        return s;
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    s.truncate(cut);
    s
}

/// Derives the local PDF file name for a document URL
///
/// The whole path takes part so that same-named files in different folders
/// do not overwrite each other: `/docs/CM_15mars2019.pdf` becomes
/// `docs_CM_15mars2019.pdf`.
pub fn local_pdf_name(url: &Url) -> String {
    let path = url.path().trim_start_matches('/');
    let decoded = urlencoding::decode(path)
        .map(|p| p.into_owned())
        .unwrap_or_else(|_| path.to_string());

    let name = sanitize_filename(&decoded);
    if name.is_empty() || name.chars().all(|c| c == '_' || c == '.') {
        FALLBACK_NAME.to_string()
    } else {
        name
    }
}

/// Inserts a short digest of the full URL before the extension
///
/// For names already owned by another URL in the output directory, such as
/// `dl.pdf?id=1` and `dl.pdf?id=2` which both map to `dl.pdf`. The stem is
/// shortened so the result stays within [`MAX_FILENAME_BYTES`].
pub fn disambiguated_pdf_name(name: &str, url: &Url) -> String {
    let digest = hex::encode(Sha256::digest(url.as_str().as_bytes()));
    let suffix = &digest[..DIGEST_SUFFIX_LEN];

    let (stem, ext) = match name.rfind('.') {
        Some(dot) if dot > 0 => name.split_at(dot),
        _ => (name, ""),
    };
    let room = MAX_FILENAME_BYTES.saturating_sub(ext.len() + suffix.len() + 1);
    let stem = truncate_to_bytes(stem.to_string(), room);

    truncate_to_bytes(format!("{}_{}{}", stem, suffix, ext), MAX_FILENAME_BYTES)
}
