//! Process command: consolidate the raw store into one table

use super::shared::{RunSummary, print_processing_report};
use crate::cli::args::{ConsolidateOptions, ProcessArgs};
use crate::models::ProcessingStats;
use crate::processor::ArchiveProcessor;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

pub fn run_process(args: ProcessArgs) -> Result<RunSummary> {
    debug!("Process arguments: {:?}", args);
    let stats = consolidate(&args.consolidate, &args.raw_dir)?;
    Ok(RunSummary {
        download: None,
        processing: Some(stats),
    })
}

/// Walk every archive in `raw_dir` and write the consolidated table
pub fn consolidate(options: &ConsolidateOptions, raw_dir: &Path) -> Result<ProcessingStats> {
    let config = options.to_config(raw_dir);
    let mut processor = ArchiveProcessor::new(config)?;
    let stats = processor
        .process()
        .with_context(|| format!("Consolidating archives from {} failed", raw_dir.display()))?;

    print_processing_report(&stats);
    Ok(stats)
}
