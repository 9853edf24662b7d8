//! Directory listing interpretation
//!
//! Index pages are plain HTML listings; every `<a href>` is either an
//! archive candidate, a subdirectory worth visiting, or noise.

use regex::Regex;
use scraper::{Html, Selector};
use std::sync::OnceLock;

fn recent_year_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"202\d").expect("invalid year regex"))
}

/// Every `href` attribute of an anchor in `html`, in document order
pub fn extract_hrefs(html: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };
    Html::parse_document(html)
        .select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .map(str::to_string)
        .collect()
}

/// `.zip` link (any case) carrying a 202x year token
pub fn is_archive_link(href: &str) -> bool {
    href.to_lowercase().contains(".zip") && recent_year_re().is_match(href)
}

/// Relative subdirectory link; excludes query, absolute, self and parent links
pub fn is_traversable_dir(href: &str) -> bool {
    href.ends_with('/')
        && !href.starts_with('?')
        && !href.starts_with('/')
        && href != "./"
        && href != "../"
}
