//! Configuration management and validation.
//!
//! Provides the settings for the normalization pipeline (where archives live,
//! where the consolidated table goes, which columns and rows matter) and for
//! the link discovery crawler.

use crate::constants::{
    DATE_COLUMN, DEFAULT_KEYWORDS, DEFAULT_MAX_DEPTH, DEFAULT_MAX_SELECTED,
    DEFAULT_OPERATORS_REGISTRY_URL, DEFAULT_OUTPUT_PATH, DEFAULT_RAW_DIR, DEFAULT_ROOT_URL,
    DEFAULT_USER_AGENT, DEFAULT_YEARS, DESCRIPTION_PATTERN, REGISTRY_COLUMN,
    VALUE_PATTERNS,
};
use crate::error::{ProcessorError, Result};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// Settings for turning raw archives into the consolidated table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Directory holding the downloaded archives
    pub raw_dir: PathBuf,

    /// Consolidated output table
    pub output_path: PathBuf,

    /// Rows are kept when their description contains any of these (upper-case)
    pub keywords: Vec<String>,

    /// Substring identifying the description column
    pub description_pattern: String,

    /// Substrings identifying the value column
    pub value_patterns: Vec<String>,

    /// Optional column carried through as the accounting date
    pub date_column: String,

    /// Optional column carried through as the registry id
    pub registry_column: String,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            raw_dir: PathBuf::from(DEFAULT_RAW_DIR),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            keywords: DEFAULT_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            description_pattern: DESCRIPTION_PATTERN.to_string(),
            value_patterns: VALUE_PATTERNS.iter().map(|s| s.to_string()).collect(),
            date_column: DATE_COLUMN.to_string(),
            registry_column: REGISTRY_COLUMN.to_string(),
        }
    }
}

impl ProcessorConfig {
    /// Use a different raw store directory
    pub fn with_raw_dir(mut self, raw_dir: impl Into<PathBuf>) -> Self {
        self.raw_dir = raw_dir.into();
        self
    }

    /// Use a different output table
    pub fn with_output_path(mut self, output_path: impl Into<PathBuf>) -> Self {
        self.output_path = output_path.into();
        self
    }

    /// Replace the keyword filter
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords
            .into_iter()
            .map(|k| k.into().to_uppercase())
            .collect();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(ProcessorError::Configuration {
                message: "At least one non-empty keyword is required".to_string(),
            });
        }
        if self.description_pattern.trim().is_empty() {
            return Err(ProcessorError::Configuration {
                message: "Description column pattern must not be empty".to_string(),
            });
        }
        if self.value_patterns.iter().all(|p| p.trim().is_empty()) {
            return Err(ProcessorError::Configuration {
                message: "At least one value column pattern is required".to_string(),
            });
        }
        debug!("Processor configuration validated: {:?}", self);
        Ok(())
    }
}

/// Settings for the link discovery crawler and downloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// Index listing containing one directory per year
    pub root_url: String,

    /// Directory levels fetched below each year directory
    pub max_depth: usize,

    /// Number of year directories searched, counting back from the reference year
    pub years: usize,

    /// Number of archives kept after ranking
    pub max_selected: usize,

    /// Year to count back from; the current year when unset
    pub reference_year: Option<i32>,

    /// User agent presented to the listing server
    pub user_agent: String,

    /// Skip TLS certificate verification
    pub accept_invalid_certs: bool,

    /// Request timeout in seconds; no timeout when unset
    pub timeout_secs: Option<u64>,

    /// Operators registry downloaded after the archives; skipped when unset
    pub operators_registry_url: Option<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            root_url: DEFAULT_ROOT_URL.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            years: DEFAULT_YEARS,
            max_selected: DEFAULT_MAX_SELECTED,
            reference_year: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_invalid_certs: false,
            timeout_secs: None,
            operators_registry_url: Some(DEFAULT_OPERATORS_REGISTRY_URL.to_string()),
        }
    }
}

impl CrawlerConfig {
    /// Crawl a different index listing
    pub fn with_root_url(mut self, root_url: impl Into<String>) -> Self {
        self.root_url = root_url.into();
        self
    }

    /// Set the maximum crawl depth
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Pin the year the crawler counts back from
    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.reference_year = Some(year);
        self
    }

    /// Year directories to search, most recent first
    pub fn target_years(&self) -> Vec<i32> {
        let reference = self
            .reference_year
            .unwrap_or_else(|| chrono::Local::now().year());
        (0..self.years as i32).map(|i| reference - i).collect()
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(ProcessorError::Configuration {
                message: "Crawl depth must be at least 1".to_string(),
            });
        }
        if self.years == 0 || self.max_selected == 0 {
            return Err(ProcessorError::Configuration {
                message: "Year count and selection size must be at least 1".to_string(),
            });
        }
        if reqwest::Url::parse(&self.root_url).is_err() {
            return Err(ProcessorError::Configuration {
                message: format!("Invalid root URL: {}", self.root_url),
            });
        }
        Ok(())
    }
}
