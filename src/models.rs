//! Core data structures and types for ANS processing.
//!
//! Defines the reporting period, the canonical output record, the soft
//! per-unit outcome and the statistics reported at the end of a run.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Reporting period of one archive, derived from its file name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeriodTag {
    /// Quarter, 1 to 4
    pub quarter: u8,
    /// Four-digit year
    pub year: u16,
}

impl fmt::Display for PeriodTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}T{}", self.quarter, self.year)
    }
}

/// One row of the consolidated output table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub quarter: u8,
    pub year: u16,
    pub accounting_date: Option<String>,
    pub registry_id: Option<String>,
    pub description: String,
    /// Always a finite number; unparseable source cells become 0.0
    pub value: f64,
}

/// One archive in the raw store
#[derive(Debug, Clone)]
pub struct ArchiveReference {
    /// File name inside the raw store
    pub name: String,
    pub path: PathBuf,
}

/// Why a unit (archive or data file) was left out of the output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No quarter/year pattern in the archive name
    UnresolvedPeriod,
    /// Archive holds no csv/txt/xlsx entry
    NoDataFile,
    /// Every parser trial failed for the data file
    Unreadable { file: String },
    /// Data file parsed but holds no rows
    EmptyFrame { file: String },
    /// No column name contains the description pattern
    MissingDescriptionColumn,
    /// No row matched the keyword filter
    NoMatchingRows,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnresolvedPeriod => {
                write!(f, "could not identify quarter/year in the archive name")
            }
            SkipReason::NoDataFile => write!(f, "no csv/txt/xlsx file inside the archive"),
            SkipReason::Unreadable { file } => {
                write!(f, "unsupported or unreadable data file: {}", file)
            }
            SkipReason::EmptyFrame { file } => write!(f, "data file has no rows: {}", file),
            SkipReason::MissingDescriptionColumn => write!(f, "description column not found"),
            SkipReason::NoMatchingRows => write!(f, "no events/claims rows"),
        }
    }
}

/// Soft result of processing one unit: either it produced something or it
/// was skipped for a stated reason. Fatal problems use `ProcessorError`.
#[derive(Debug, Clone, PartialEq)]
pub enum UnitOutcome<T> {
    Produced(T),
    Skipped(SkipReason),
}

impl<T> UnitOutcome<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> UnitOutcome<U> {
        match self {
            UnitOutcome::Produced(value) => UnitOutcome::Produced(f(value)),
            UnitOutcome::Skipped(reason) => UnitOutcome::Skipped(reason),
        }
    }
}

/// What one accepted archive contributed to the output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub period: PeriodTag,
    /// Entry inside the archive that was loaded
    pub data_file: String,
    pub rows: usize,
}

/// Candidate archive link found while crawling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredLink {
    pub url: String,
    /// Directory depth at which the link was found (0 = year directory)
    pub depth: usize,
}

impl DiscoveredLink {
    /// Last path segment of the URL
    pub fn file_name(&self) -> &str {
        self.url.rsplit('/').next().unwrap_or(&self.url)
    }
}

/// Processing statistics
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub archives_found: usize,
    pub archives_processed: usize,
    pub archives_skipped: usize,
    pub total_rows: usize,
    pub output_path: PathBuf,
    pub processing_time_ms: u128,
}

/// Result of fetching one file into the raw store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Downloaded { path: PathBuf, bytes: u64 },
    /// A file with the same name was already in the raw store
    AlreadyPresent { path: PathBuf },
    Failed { reason: String },
}

/// Download statistics for one fetch run
#[derive(Debug, Default)]
pub struct DownloadStats {
    pub links_selected: usize,
    pub downloaded: usize,
    pub already_present: usize,
    pub failed: usize,
    pub registry_path: Option<PathBuf>,
}
