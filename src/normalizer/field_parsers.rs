//! Field parsing utilities for financial-statement cells
//!
//! Cell values arrive as raw text in either a plain dot-decimal form
//! (`1234.56`) or the Brazilian locale form (`1.234,56`). Parsing is total:
//! anything that cannot be read as a number becomes `0.0`, so a single bad
//! cell never aborts an archive.

/// Parse a monetary cell into a finite decimal.
///
/// - missing cell: `0.0`
/// - digits with at most one `.` (optionally signed): parsed as-is
/// - anything containing `,`: `.` dropped as thousands separator, `,` read as the decimal point
/// - everything else: `0.0`
pub fn parse_monetary(cell: Option<&str>) -> f64 {
    let Some(raw) = cell else {
        return 0.0;
    };
    let value = raw.trim();

    if is_plain_decimal(value) {
        return finite_or_zero(value.parse::<f64>().ok());
    }

    if value.contains(',') {
        let normalized = value.replace('.', "").replace(',', ".");
        return finite_or_zero(normalized.parse::<f64>().ok());
    }

    0.0
}

/// Digits with at most one dot and an optional leading minus
fn is_plain_decimal(value: &str) -> bool {
    let unsigned = value.strip_prefix('-').unwrap_or(value);
    let mut digits = 0usize;
    let mut dots = 0usize;
    for ch in unsigned.chars() {
        match ch {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return false,
        }
    }
    digits > 0 && dots <= 1
}

fn finite_or_zero(parsed: Option<f64>) -> f64 {
    match parsed {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Trimmed cell text, `None` when blank
pub fn non_empty(cell: Option<&str>) -> Option<&str> {
    cell.map(str::trim).filter(|s| !s.is_empty())
}
