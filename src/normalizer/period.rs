//! Reporting period extraction from archive file names
//!
//! Archives are named after the quarter they cover, e.g. `1T2024.zip` or
//! `Relatorio_3t2023_v2.zip`: a quarter digit, the letter `T`, a four-digit year.

use crate::models::PeriodTag;
use regex::Regex;
use std::sync::OnceLock;

fn period_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)([1-4])T(\d{4})").expect("invalid period regex"))
}

/// Quarter and year encoded in `file_name`; first match wins.
///
/// Returns `None` when the name carries no period, in which case nothing in
/// the archive can be attributed and it must be skipped.
pub fn extract_period(file_name: &str) -> Option<PeriodTag> {
    let caps = period_re().captures(file_name)?;
    let quarter = caps.get(1)?.as_str().parse::<u8>().ok()?;
    let year = caps.get(2)?.as_str().parse::<u16>().ok()?;
    Some(PeriodTag { quarter, year })
}
