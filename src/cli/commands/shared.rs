//! Shared components for CLI commands

use crate::cli::args::LoggingOptions;
use crate::config::CrawlerConfig;
use crate::crawler::fetch::HttpFetcher;
use crate::error::Result;
use crate::models::{DownloadStats, ProcessingStats};
use colored::*;
use tracing::debug;

/// What a command did, for the exit report
#[derive(Debug, Default)]
pub struct RunSummary {
    pub download: Option<DownloadStats>,
    pub processing: Option<ProcessingStats>,
}

/// Set up structured logging on stderr
pub fn setup_logging(options: &LoggingOptions) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = options.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ans_processor={}", log_level)));

    if options.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
}

/// HTTP fetcher for the crawl, without a progress bar in quiet mode
pub fn build_fetcher(config: &CrawlerConfig, logging: &LoggingOptions) -> Result<HttpFetcher> {
    let fetcher = HttpFetcher::new(config)?;
    Ok(if logging.quiet {
        fetcher.without_progress()
    } else {
        fetcher
    })
}

pub fn print_download_report(stats: &DownloadStats) {
    println!("\n{}", "Download finished".bright_green().bold());
    println!(
        "  {} {} selected, {} downloaded, {} already present, {} failed",
        "Archives:".bright_cyan(),
        stats.links_selected,
        stats.downloaded,
        stats.already_present,
        stats.failed
    );
    if let Some(path) = &stats.registry_path {
        println!("  {} {}", "Registry:".bright_cyan(), path.display());
    }
}

pub fn print_processing_report(stats: &ProcessingStats) {
    println!(
        "  {} {}",
        "Consolidated table:".bright_cyan(),
        stats.output_path.display()
    );
}
