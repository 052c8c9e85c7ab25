//! Heuristics applied to PDF candidates
//!
//! - `dates`: meeting-date inference from URL paths and anchor texts
//! - `window`: the inclusive year window gating downloads
//! - `filename`: local file naming for downloaded documents
//! - `keywords`: advisory minutes-keyword match

mod dates;
mod filename;
mod keywords;
mod window;

pub use dates::guess_date;
pub use filename::{disambiguated_pdf_name, local_pdf_name, sanitize_filename, MAX_FILENAME_BYTES};
pub use keywords::matches_minutes_keywords;
pub use window::YearWindow;
