use chrono::{Datelike, NaiveDate};
use std::fmt;

/// Inclusive range of calendar years gating downloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearWindow {
    pub from_year: i32,
    pub to_year: i32,
}

impl YearWindow {
    pub fn new(from_year: i32, to_year: i32) -> Self {
        Self { from_year, to_year }
    }

    /// Returns true if the date's year lies within the window
    pub fn contains(&self, date: NaiveDate) -> bool {
        (self.from_year..=self.to_year).contains(&date.year())
    }

    /// Download decision for a candidate
    ///
    /// An undated candidate is always admitted: a missed set of minutes costs
    /// more than a wasted download.
    pub fn admits(&self, guessed: Option<NaiveDate>) -> bool {
        guessed.map_or(true, |date| self.contains(date))
    }
}

impl fmt::Display for YearWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from_year, self.to_year)
    }
}
