//! Link discovery and download of recent statement archives.
//!
//! The regulator publishes one directory per year, sometimes with nested
//! subdirectories. [`LinkCrawler`] walks each recent year directory depth
//! first, one request at a time, collecting `.zip` links that carry a 202x
//! year. A directory that cannot be fetched contributes nothing and the walk
//! goes on. Candidates are deduplicated, ranked by descending URL and the
//! top few are downloaded into the raw store.

pub mod download;
pub mod fetch;
pub mod listing;

use self::download::{download_file, file_name_from_url};
use self::fetch::ListingFetcher;
use self::listing::{extract_hrefs, is_archive_link, is_traversable_dir};

use crate::config::CrawlerConfig;
use crate::error::{ProcessorError, Result};
use crate::models::{DiscoveredLink, DownloadOutcome, DownloadStats};

use colored::*;
use reqwest::Url;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Depth-bounded crawler over an index-style listing
#[derive(Debug)]
pub struct LinkCrawler<F: ListingFetcher> {
    config: CrawlerConfig,
    fetcher: F,
}

impl<F: ListingFetcher> LinkCrawler<F> {
    pub fn new(config: CrawlerConfig, fetcher: F) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, fetcher })
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    /// Ranked archive links from the most recent year directories
    pub fn discover(&self) -> Result<Vec<DiscoveredLink>> {
        let root = parse_url(&self.config.root_url)?;
        let mut candidates = Vec::new();

        for year in self.config.target_years() {
            let year_url = root
                .join(&format!("{}/", year))
                .map_err(|e| ProcessorError::Configuration {
                    message: format!("Cannot build year URL for {}: {}", year, e),
                })?;
            info!("Searching {}", year_url);
            candidates.extend(self.collect_archives(&year_url, 0));
        }

        info!("Total valid archives found: {}", candidates.len());
        Ok(rank_links(candidates, self.config.max_selected))
    }

    /// Archive links under `url`, which sits `depth` levels below a year directory.
    ///
    /// Never fails: unreachable or unparseable directories yield nothing.
    pub fn collect_archives(&self, url: &Url, depth: usize) -> Vec<DiscoveredLink> {
        if depth >= self.config.max_depth {
            return Vec::new();
        }

        let response = match self.fetcher.fetch(url.as_str()) {
            Ok(response) => response,
            Err(e) => {
                warn!("Failed to read {}: {}", url, e);
                return Vec::new();
            }
        };
        if !response.is_success() {
            debug!("{} answered HTTP {}", url, response.status);
            return Vec::new();
        }

        let mut found = Vec::new();
        for href in extract_hrefs(&response.text()) {
            if is_archive_link(&href) {
                match url.join(&href) {
                    Ok(link) => {
                        debug!("{}Archive found: {}", "  ".repeat(depth + 1), href);
                        found.push(DiscoveredLink {
                            url: link.to_string(),
                            depth,
                        });
                    }
                    Err(e) => debug!("Ignoring malformed link {}: {}", href, e),
                }
            } else if is_traversable_dir(&href) {
                match url.join(&href) {
                    Ok(child) => found.extend(self.collect_archives(&child, depth + 1)),
                    Err(e) => debug!("Ignoring malformed directory {}: {}", href, e),
                }
            }
        }
        found
    }

    /// Discover, then download the selected archives and the operators registry
    /// into `raw_dir`.
    ///
    /// Archive download failures are tolerated; a missing registry is not.
    pub fn fetch_into(&self, raw_dir: &Path) -> Result<DownloadStats> {
        println!("{}", "Discovering financial statement archives".bright_green().bold());
        println!("  {} {}", "Index:".bright_cyan(), self.config.root_url);

        let links = self.discover()?;
        if links.is_empty() {
            return Err(ProcessorError::NoLinksDiscovered {
                root: self.config.root_url.clone(),
            });
        }

        let names: Vec<&str> = links.iter().map(DiscoveredLink::file_name).collect();
        println!(
            "  {} {}\n",
            "Selected for download:".bright_cyan(),
            names.join(", ")
        );

        let mut stats = DownloadStats {
            links_selected: links.len(),
            ..Default::default()
        };

        for link in &links {
            match download_file(&self.fetcher, &link.url, raw_dir)? {
                DownloadOutcome::Downloaded { bytes, .. } => {
                    stats.downloaded += 1;
                    println!(
                        "  {} {} ({} bytes)",
                        "Downloaded".bright_green(),
                        link.file_name(),
                        bytes
                    );
                }
                DownloadOutcome::AlreadyPresent { .. } => {
                    stats.already_present += 1;
                    println!("  {} {}", "Already present".bright_yellow(), link.file_name());
                }
                DownloadOutcome::Failed { reason } => {
                    stats.failed += 1;
                    warn!("Download of {} failed: {}", link.url, reason);
                    println!("  {} {}: {}", "Failed".yellow(), link.file_name(), reason);
                }
            }
        }

        if let Some(registry_url) = &self.config.operators_registry_url {
            stats.registry_path = Some(self.fetch_registry(registry_url, raw_dir)?);
        }

        Ok(stats)
    }

    fn fetch_registry(&self, url: &str, raw_dir: &Path) -> Result<std::path::PathBuf> {
        println!(
            "\n{} {}",
            "Operators registry:".bright_cyan(),
            file_name_from_url(url).unwrap_or(url)
        );
        match download_file(&self.fetcher, url, raw_dir)? {
            DownloadOutcome::Downloaded { path, .. }
            | DownloadOutcome::AlreadyPresent { path } => Ok(path),
            DownloadOutcome::Failed { reason } => Err(ProcessorError::DownloadFailed {
                url: url.to_string(),
                reason,
            }),
        }
    }
}

/// Unique links by URL, highest URL first, at most `max_selected`
pub fn rank_links(links: Vec<DiscoveredLink>, max_selected: usize) -> Vec<DiscoveredLink> {
    let mut unique: BTreeMap<String, DiscoveredLink> = BTreeMap::new();
    for link in links {
        unique.entry(link.url.clone()).or_insert(link);
    }
    unique.into_values().rev().take(max_selected).collect()
}

fn parse_url(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|e| ProcessorError::Configuration {
        message: format!("Invalid root URL {}: {}", url, e),
    })
}
