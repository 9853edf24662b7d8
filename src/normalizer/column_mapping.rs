//! Column resolution for loosely structured statement files
//!
//! Column names drift from release to release, so the description and value
//! columns are located by substring match on the upper-cased header rather
//! than by position. Both lookups scan in declared column order and take the
//! first match.

/// First column whose upper-cased name contains `pattern`
pub fn find_description_column<'a, S: AsRef<str>>(
    columns: &'a [S],
    pattern: &str,
) -> Option<&'a str> {
    let pattern = pattern.to_uppercase();
    names(columns).find(|name| name.to_uppercase().contains(&pattern))
}

/// First column whose upper-cased name contains any of `patterns`.
///
/// Headers with several value-like columns (e.g. `VL_SALDO_INICIAL` before
/// `VL_SALDO_FINAL`) resolve to whichever comes first.
pub fn find_value_column<'a, S: AsRef<str>>(
    columns: &'a [S],
    patterns: &[String],
) -> Option<&'a str> {
    let patterns: Vec<String> = patterns
        .iter()
        .filter(|p| !p.is_empty())
        .map(|p| p.to_uppercase())
        .collect();
    names(columns).find(|name| {
        let upper = name.to_uppercase();
        patterns.iter().any(|p| upper.contains(p.as_str()))
    })
}

/// Column with exactly this name, if present
pub fn find_exact_column<'a, S: AsRef<str>>(columns: &'a [S], name: &str) -> Option<&'a str> {
    names(columns).find(|c| c.trim() == name)
}

fn names<S: AsRef<str>>(columns: &[S]) -> impl Iterator<Item = &str> {
    columns.iter().map(|c| c.as_ref())
}
