//! Command implementations for the ANS processor CLI
//!
//! Each subcommand lives in its own module; `run` chains fetch and process
//! over the same raw store.

pub mod fetch;
pub mod process;
pub mod shared;

pub use shared::RunSummary;

use crate::cli::args::{Args, Commands, RunArgs};
use anyhow::Result;
use shared::setup_logging;

/// Dispatch to the subcommand handler. Returns `None` when no subcommand
/// was given.
pub fn run(args: Args) -> Option<Result<RunSummary>> {
    let command = args.command?;
    setup_logging(command.logging());

    Some(match command {
        Commands::Fetch(fetch_args) => fetch::run_fetch(fetch_args),
        Commands::Process(process_args) => process::run_process(process_args),
        Commands::Run(run_args) => run_all(run_args),
    })
}

fn run_all(args: RunArgs) -> Result<RunSummary> {
    let download = fetch::fetch_archives(&args.crawl, &args.logging, &args.raw_dir)?;
    println!();
    let processing = process::consolidate(&args.consolidate, &args.raw_dir)?;
    Ok(RunSummary {
        download: Some(download),
        processing: Some(processing),
    })
}
