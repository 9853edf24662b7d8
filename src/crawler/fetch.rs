//! Remote listing transport
//!
//! The crawler and the downloader only need `fetch(url) -> (status, bytes)`;
//! [`HttpFetcher`] provides it over blocking HTTP and streams downloads to
//! disk behind a progress bar.

use crate::config::CrawlerConfig;
use crate::error::Result;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use std::io::Write;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Status and body of one listing request
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body decoded as text; invalid UTF-8 is replaced
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Transport failure for a single request
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Source of listing pages and downloadable files
pub trait ListingFetcher {
    fn fetch(&self, url: &str) -> std::result::Result<FetchResponse, FetchError>;

    /// Write the body of `url` into `sink` when the request succeeds.
    /// Returns the response status; nothing is written for other statuses.
    fn fetch_to(
        &self,
        url: &str,
        sink: &mut dyn Write,
    ) -> std::result::Result<u16, FetchError> {
        let response = self.fetch(url)?;
        if response.is_success() {
            sink.write_all(&response.body)?;
        }
        Ok(response.status)
    }
}

/// Blocking HTTP fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    show_progress: bool,
}

impl HttpFetcher {
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .timeout(config.timeout_secs.map(Duration::from_secs))
            .build()?;
        Ok(Self {
            client,
            show_progress: true,
        })
    }

    /// Disable the download progress bar
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    fn progress_bar(&self, total: Option<u64>, url: &str) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = match total {
            Some(len) => ProgressBar::new(len),
            None => ProgressBar::new_spinner(),
        };
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} | {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▉▊▋▌▍▎▏  "),
        );
        pb.set_message(url.rsplit('/').next().unwrap_or(url).to_string());
        pb
    }
}

impl ListingFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> std::result::Result<FetchResponse, FetchError> {
        debug!("GET {}", url);
        let response = self.client.get(url).send()?;
        let status = response.status().as_u16();
        let body = response.bytes()?.to_vec();
        Ok(FetchResponse { status, body })
    }

    fn fetch_to(
        &self,
        url: &str,
        sink: &mut dyn Write,
    ) -> std::result::Result<u16, FetchError> {
        debug!("GET {} (streaming)", url);
        let mut response = self.client.get(url).send()?;
        let status = response.status().as_u16();
        if !response.status().is_success() {
            return Ok(status);
        }

        let pb = self.progress_bar(response.content_length(), url);
        let mut writer = pb.wrap_write(sink);
        let copied = response.copy_to(&mut writer);
        pb.finish_and_clear();

        debug!("{}: {} bytes", url, copied?);
        Ok(status)
    }
}
