use regex::Regex;
use std::sync::LazyLock;

/// Words that usually mark council minutes in a link or file name
static MINUTES_KEYWORDS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)conseil|compte[- ]?rendu|proc[eé]s[- ]?verbal|d[ée]lib[ée]ration|\bcm\b|\bpv\b",
    )
    .expect("keyword pattern is valid")
});

/// Returns true if the text looks like it names council minutes
///
/// Advisory only: every `.pdf` link is resolved, since lists of minutes
/// often link bare names such as `PV.pdf` or `scan0001.pdf`.
pub fn matches_minutes_keywords(text: &str) -> bool {
    MINUTES_KEYWORDS_RE.is_match(text)
}
