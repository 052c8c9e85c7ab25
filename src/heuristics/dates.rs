//! Date inference from document URLs and link text
//!
//! Minutes are rarely published with metadata, but their file names and
//! anchor texts almost always carry the meeting date in one of a handful of
//! French or English spellings: `CM_15mars2019`, `PV du 1er juillet 2021`,
//! `2019-03-15`, `15/03/2019`, `pv-du-cm-du-30082024`, `uploads/2019/03/`.
//!
//! [`guess_date`] runs two stages: a general day-first parser working on a
//! token stream, then a pattern match over the raw string.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

/// Years accepted when a four-digit number stands alone
const LONE_YEAR_RANGE: std::ops::RangeInclusive<i32> = 1950..=2100;

/// Pattern fallback: day + month name + year, or an ISO-like numeric triplet
static DATE_HINT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:(\d{1,2})[-_/ ]?(janv|jan|f[eé]vr|feb|mars|mar|avr|apr|mai|may|juin|jun|juil|jul|ao[uû]t|aug|sept|sep|oct|nov|d[eé]c)[a-zéèû]*\.?[-_/ ]?(\d{2,4})|(\d{4})[-_/ ]?(\d{1,2})[-_/ ]?(\d{1,2}))",
    )
    .expect("date hint pattern is valid")
});

/// Infers a calendar date from a file name, URL path or anchor text
///
/// Returns `None` when nothing date-like is found.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use minutes_harvester::heuristics::guess_date;
///
/// assert_eq!(
///     guess_date("/docs/CM_15mars2019.pdf"),
///     NaiveDate::from_ymd_opt(2019, 3, 15)
/// );
/// assert_eq!(guess_date("report.pdf"), None);
/// ```
pub fn guess_date(s: &str) -> Option<NaiveDate> {
    if s.trim().is_empty() {
        return None;
    }

    parse_fuzzy(s).or_else(|| parse_hint(s))
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Num(String),
    Word(String),
}

/// Stage one: day-first parsing over alternating digit/letter tokens
///
/// Complete dates anywhere in the string win over partial ones, so a dated
/// file name inside a `/2020/01/` upload folder keeps its own date.
fn parse_fuzzy(s: &str) -> Option<NaiveDate> {
    let tokens = tokenize(s);

    (0..tokens.len())
        .find_map(|i| full_date_at(&tokens[i..]))
        .or_else(|| tokens.iter().find_map(compact_date))
        .or_else(|| (0..tokens.len()).find_map(|i| partial_date_at(&tokens[i..])))
        .or_else(|| tokens.iter().find_map(lone_year))
}

/// Stage two: the hint pattern over the raw string
fn parse_hint(s: &str) -> Option<NaiveDate> {
    let caps = DATE_HINT_RE.captures(s)?;

    if let (Some(day), Some(month), Some(year)) = (caps.get(1), caps.get(2), caps.get(3)) {
        let month = month_from_word(&fold(month.as_str()))?;
        let year = expand_year(year.as_str())?;
        return NaiveDate::from_ymd_opt(year, month, day.as_str().parse().ok()?);
    }

    let year = caps.get(4)?.as_str().parse().ok()?;
    let month = caps.get(5)?.as_str().parse().ok()?;
    let day = caps.get(6)?.as_str().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn tokenize(s: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_digits = false;

    for c in fold(s).chars() {
        let is_digit = c.is_ascii_digit();
        let is_letter = c.is_alphabetic();

        if !is_digit && !is_letter {
            push_token(&mut tokens, &mut current, in_digits);
            continue;
        }

        if !current.is_empty() && is_digit != in_digits {
            push_token(&mut tokens, &mut current, in_digits);
        }
        in_digits = is_digit;
        current.push(c);
    }
    push_token(&mut tokens, &mut current, in_digits);

    tokens
}

fn push_token(tokens: &mut Vec<Token>, current: &mut String, digits: bool) {
    if current.is_empty() {
        return;
    }
    let text = std::mem::take(current);
    tokens.push(if digits {
        Token::Num(text)
    } else {
        Token::Word(text)
    });
}

/// Lowercases and strips the accents that occur in French month names
fn fold(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| match c {
            'à' | 'â' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'î' | 'ï' => 'i',
            'ô' | 'ö' => 'o',
            'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

fn month_from_word(word: &str) -> Option<u32> {
    let month = match word.trim_end_matches('.') {
        "janvier" | "janv" | "jan" | "january" => 1,
        "fevrier" | "fevr" | "fev" | "feb" | "february" => 2,
        "mars" | "mar" | "march" => 3,
        "avril" | "avr" | "apr" | "april" => 4,
        "mai" | "may" => 5,
        "juin" | "jun" | "june" => 6,
        "juillet" | "juil" | "jul" | "july" => 7,
        "aout" | "aou" | "aug" | "august" => 8,
        "septembre" | "sept" | "sep" | "september" => 9,
        "octobre" | "oct" | "october" => 10,
        "novembre" | "nov" | "november" => 11,
        "decembre" | "dec" | "december" => 12,
        _ => return None,
    };
    Some(month)
}

/// Four-digit years as-is, two-digit years pivot at 70
fn expand_year(digits: &str) -> Option<i32> {
    let value: i32 = digits.parse().ok()?;
    match digits.len() {
        4 => Some(value),
        2 if value < 70 => Some(2000 + value),
        2 => Some(1900 + value),
        _ => None,
    }
}

fn num(token: Option<&Token>, max_len: usize) -> Option<&str> {
    match token {
        Some(Token::Num(n)) if n.len() <= max_len => Some(n.as_str()),
        _ => None,
    }
}

fn four_digit_year(token: Option<&Token>) -> Option<i32> {
    match token {
        Some(Token::Num(n)) if n.len() == 4 => n.parse().ok(),
        _ => None,
    }
}

fn month_word(token: Option<&Token>) -> Option<u32> {
    match token {
        Some(Token::Word(w)) => month_from_word(w),
        _ => None,
    }
}

/// Complete dates starting at the first token
fn full_date_at(tokens: &[Token]) -> Option<NaiveDate> {
    let first = tokens.first();

    // 2019-03-15
    if let Some(year) = four_digit_year(first) {
        let month = num(tokens.get(1), 2)?.parse().ok();
        let day = num(tokens.get(2), 2).and_then(|d| d.parse().ok());
        return match (month, day) {
            (Some(month), Some(day)) => NaiveDate::from_ymd_opt(year, month, day),
            _ => None,
        };
    }

    let day: u32 = num(first, 2)?.parse().ok()?;

    // 15/03/2019, 15-03-19; month-first only when day-first is impossible
    if let (Some(second), Some(third)) = (num(tokens.get(1), 2), tokens.get(2)) {
        let year = match third {
            Token::Num(n) => expand_year(n),
            Token::Word(_) => None,
        };
        if let (Ok(second), Some(year)) = (second.parse::<u32>(), year) {
            return NaiveDate::from_ymd_opt(year, second, day)
                .or_else(|| NaiveDate::from_ymd_opt(year, day, second));
        }
        return None;
    }

    // 15 mars 2019, 1er juillet 2021
    let mut rest = &tokens[1..];
    if matches!(rest.first(), Some(Token::Word(w)) if w == "er") {
        rest = &rest[1..];
    }
    let month = month_word(rest.first())?;
    let year = four_digit_year(rest.get(1))?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// `ddmmyyyy`, then `yyyymmdd`
fn compact_date(token: &Token) -> Option<NaiveDate> {
    let Token::Num(n) = token else {
        return None;
    };
    if n.len() != 8 {
        return None;
    }

    let part = |range: std::ops::Range<usize>| n[range].parse::<u32>().ok();
    let day_first = match (part(0..2), part(2..4), part(4..8)) {
        (Some(d), Some(m), Some(y)) => NaiveDate::from_ymd_opt(y as i32, m, d),
        _ => None,
    };
    day_first.or_else(|| match (part(0..4), part(4..6), part(6..8)) {
        (Some(y), Some(m), Some(d)) => NaiveDate::from_ymd_opt(y as i32, m, d),
        _ => None,
    })
}

/// Month and year without a day: `mars 2019`, `2019/03`
fn partial_date_at(tokens: &[Token]) -> Option<NaiveDate> {
    if let Some(month) = month_word(tokens.first()) {
        let year = four_digit_year(tokens.get(1))?;
        return NaiveDate::from_ymd_opt(year, month, 1);
    }

    let year = four_digit_year(tokens.first())?;
    let month = num(tokens.get(1), 2)?.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn lone_year(token: &Token) -> Option<NaiveDate> {
    let year = four_digit_year(Some(token))?;
    if LONE_YEAR_RANGE.contains(&year) {
        NaiveDate::from_ymd_opt(year, 1, 1)
    } else {
        None
    }
}
