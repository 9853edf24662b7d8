//! ANS Processor Library
//!
//! Discovers, downloads and consolidates the quarterly financial statements
//! that Brazilian health plan operators file with ANS.
//!
//! This library provides tools for:
//! - Crawling the open data listing for the most recent statement archives
//! - Loading semicolon/Latin-1, comma/UTF-8 and xlsx data files alike
//! - Resolving description and value columns by name heuristics
//! - Filtering claims/events rows and normalizing Brazilian money values
//! - Appending every accepted archive to one consolidated CSV table

pub mod config;
pub mod constants;
pub mod crawler;
pub mod error;
pub mod loader;
pub mod models;
pub mod normalizer;
pub mod processor;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

pub use config::{CrawlerConfig, ProcessorConfig};
pub use error::{ProcessorError, Result};
pub use models::{NormalizedRecord, PeriodTag, ProcessingStats, SkipReason, UnitOutcome};
pub use processor::ArchiveProcessor;
