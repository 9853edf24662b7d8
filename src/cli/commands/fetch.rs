//! Fetch command: discover and download recent archives

use super::shared::{RunSummary, build_fetcher, print_download_report};
use crate::cli::args::{CrawlOptions, FetchArgs, LoggingOptions};
use crate::crawler::LinkCrawler;
use crate::models::DownloadStats;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

pub fn run_fetch(args: FetchArgs) -> Result<RunSummary> {
    debug!("Fetch arguments: {:?}", args);
    let stats = fetch_archives(&args.crawl, &args.logging, &args.raw_dir)?;
    Ok(RunSummary {
        download: Some(stats),
        processing: None,
    })
}

/// Crawl the listing and download the selection into `raw_dir`
pub fn fetch_archives(
    crawl: &CrawlOptions,
    logging: &LoggingOptions,
    raw_dir: &Path,
) -> Result<DownloadStats> {
    let config = crawl.to_config();
    let fetcher = build_fetcher(&config, logging).context("Failed to set up HTTP client")?;
    let crawler = LinkCrawler::new(config, fetcher)?;

    info!("Downloading into {}", raw_dir.display());
    let stats = crawler
        .fetch_into(raw_dir)
        .with_context(|| format!("Fetching archives into {} failed", raw_dir.display()))?;

    print_download_report(&stats);
    Ok(stats)
}
