//! Command-line argument definitions for the ANS processor
//!
//! Three subcommands share option groups: `fetch` crawls and downloads,
//! `process` consolidates the raw store, `run` does both in sequence.

use crate::config::{CrawlerConfig, ProcessorConfig};
use crate::constants::DEFAULT_RAW_DIR;
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the ANS financial statement processor
///
/// Downloads the most recent quarterly financial statements published by
/// the ANS open data portal and consolidates their claims/events rows into
/// a single normalized CSV table.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ans-processor",
    version,
    about = "Download and consolidate ANS quarterly financial statements"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Discover recent archives and download them into the raw store
    Fetch(FetchArgs),
    /// Consolidate every archive in the raw store into one table
    Process(ProcessArgs),
    /// Fetch, then process
    Run(RunArgs),
}

#[derive(Debug, Clone, ClapArgs)]
pub struct FetchArgs {
    /// Directory receiving the downloaded archives
    #[arg(long = "raw-dir", value_name = "PATH", default_value = DEFAULT_RAW_DIR)]
    pub raw_dir: PathBuf,

    #[command(flatten)]
    pub crawl: CrawlOptions,

    #[command(flatten)]
    pub logging: LoggingOptions,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct ProcessArgs {
    /// Directory holding the archives to consolidate
    #[arg(long = "raw-dir", value_name = "PATH", default_value = DEFAULT_RAW_DIR)]
    pub raw_dir: PathBuf,

    #[command(flatten)]
    pub consolidate: ConsolidateOptions,

    #[command(flatten)]
    pub logging: LoggingOptions,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct RunArgs {
    /// Raw store shared by both stages
    #[arg(long = "raw-dir", value_name = "PATH", default_value = DEFAULT_RAW_DIR)]
    pub raw_dir: PathBuf,

    #[command(flatten)]
    pub crawl: CrawlOptions,

    #[command(flatten)]
    pub consolidate: ConsolidateOptions,

    #[command(flatten)]
    pub logging: LoggingOptions,
}

/// Link discovery and download options
#[derive(Debug, Clone, ClapArgs)]
pub struct CrawlOptions {
    /// Index listing with one directory per year
    #[arg(long = "root-url", value_name = "URL")]
    pub root_url: Option<String>,

    /// Directory levels searched below each year directory
    #[arg(long = "max-depth", value_name = "N")]
    pub max_depth: Option<usize>,

    /// Count year directories back from this year instead of the current one
    #[arg(long = "year", value_name = "YYYY")]
    pub reference_year: Option<i32>,

    /// Request timeout in seconds (none by default)
    #[arg(long = "timeout", value_name = "SECONDS")]
    pub timeout_secs: Option<u64>,

    /// Accept invalid TLS certificates from the listing server
    #[arg(long)]
    pub insecure: bool,

    /// Do not download the operators registry
    #[arg(long = "skip-registry")]
    pub skip_registry: bool,
}

impl CrawlOptions {
    pub fn to_config(&self) -> CrawlerConfig {
        let mut config = CrawlerConfig::default();
        if let Some(root_url) = &self.root_url {
            config = config.with_root_url(root_url.clone());
        }
        if let Some(max_depth) = self.max_depth {
            config = config.with_max_depth(max_depth);
        }
        if let Some(year) = self.reference_year {
            config = config.with_reference_year(year);
        }
        config.timeout_secs = self.timeout_secs;
        config.accept_invalid_certs = self.insecure;
        if self.skip_registry {
            config.operators_registry_url = None;
        }
        config
    }
}

/// Consolidation options
#[derive(Debug, Clone, ClapArgs)]
pub struct ConsolidateOptions {
    /// Consolidated output table
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output_path: Option<PathBuf>,

    /// Keywords selecting rows by description (comma separated)
    #[arg(long = "keywords", value_name = "LIST", value_delimiter = ',')]
    pub keywords: Option<Vec<String>>,
}

impl ConsolidateOptions {
    pub fn to_config(&self, raw_dir: &std::path::Path) -> ProcessorConfig {
        let mut config = ProcessorConfig::default().with_raw_dir(raw_dir);
        if let Some(output_path) = &self.output_path {
            config = config.with_output_path(output_path.clone());
        }
        if let Some(keywords) = &self.keywords {
            config = config.with_keywords(keywords.iter().map(|k| k.trim().to_string()));
        }
        config
    }
}

#[derive(Debug, Clone, Default, ClapArgs)]
pub struct LoggingOptions {
    /// Increase logging verbosity (-v: debug, -vv: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only show warnings and errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

impl LoggingOptions {
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }
}

impl Commands {
    pub fn logging(&self) -> &LoggingOptions {
        match self {
            Commands::Fetch(args) => &args.logging,
            Commands::Process(args) => &args.logging,
            Commands::Run(args) => &args.logging,
        }
    }
}
