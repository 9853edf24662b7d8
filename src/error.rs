//! Error handling for archive consolidation runs.
//!
//! Everything in [`ProcessorError`] aborts the run. Per-archive and
//! per-directory problems that only exclude one unit from the output are
//! not errors; they travel as [`crate::models::SkipReason`] instead.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("No archives found in raw store: {dir}")]
    NoArchives { dir: PathBuf },

    #[error("No value column found in archive {archive}. Columns: {columns:?}")]
    ValueColumnMissing {
        archive: String,
        columns: Vec<String>,
    },

    #[error("Processing failed for archive {archive} - {reason}")]
    ArchiveFailed { archive: String, reason: String },

    #[error("Download failed for {url} - {reason}")]
    DownloadFailed { url: String, reason: String },

    #[error("No archive links discovered under {root}")]
    NoLinksDiscovered { root: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

pub type Result<T> = std::result::Result<T, ProcessorError>;
