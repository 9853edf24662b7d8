use ans_processor::cli::{args::Args, commands};
use clap::Parser;
use colored::*;
use std::process;

fn main() {
    let args = Args::parse();

    let Some(result) = commands::run(args) else {
        show_help_and_commands();
        process::exit(0);
    };

    match result {
        Ok(_summary) => {
            // Commands report their own statistics
            process::exit(0);
        }
        Err(error) => {
            eprintln!("{} {:#}", "Error:".bright_red().bold(), error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("ANS Processor - Quarterly Financial Statement Consolidation");
    println!("===========================================================");
    println!();
    println!("Downloads the latest quarterly financial statements published by ANS");
    println!("and consolidates their claims/events rows into one normalized CSV table.");
    println!();
    println!("USAGE:");
    println!("    ans-processor <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    fetch       Discover recent archives and download them into the raw store");
    println!("    process     Consolidate the archives in the raw store");
    println!("    run         Fetch, then process");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    # Download the three most recent quarters and consolidate them:");
    println!("    ans-processor run");
    println!();
    println!("    # Consolidate archives already on disk:");
    println!("    ans-processor process --raw-dir data/raw -o data/processed/consolidado.csv");
    println!();
    println!("For detailed help on any command, use:");
    println!("    ans-processor <COMMAND> --help");
}
