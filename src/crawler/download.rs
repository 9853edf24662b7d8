//! Downloads into the raw store
//!
//! Files land under their last URL segment. An existing file is never
//! fetched again, and a failed transfer leaves nothing behind.

use crate::crawler::fetch::ListingFetcher;
use crate::error::Result;
use crate::models::DownloadOutcome;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Last path segment of `url`, ignoring any query string
pub fn file_name_from_url(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/').next().filter(|name| !name.is_empty())
}

/// Fetch `url` into `dest_dir`.
///
/// Transport failures and non-success statuses are reported as
/// [`DownloadOutcome::Failed`]; only local filesystem errors are fatal.
pub fn download_file<F: ListingFetcher + ?Sized>(
    fetcher: &F,
    url: &str,
    dest_dir: &Path,
) -> Result<DownloadOutcome> {
    let Some(file_name) = file_name_from_url(url) else {
        return Ok(DownloadOutcome::Failed {
            reason: format!("no file name in URL {}", url),
        });
    };

    let target = dest_dir.join(file_name);
    if target.exists() {
        info!("Already present: {}", file_name);
        return Ok(DownloadOutcome::AlreadyPresent { path: target });
    }

    fs::create_dir_all(dest_dir)?;
    let partial = partial_path(&target);
    info!("Downloading {}", file_name);

    let result = {
        let mut writer = BufWriter::new(File::create(&partial)?);
        let status = fetcher.fetch_to(url, &mut writer);
        writer.flush().map(|_| status)
    };

    match result {
        Ok(Ok(status)) if (200..300).contains(&status) => {
            fs::rename(&partial, &target)?;
            let bytes = fs::metadata(&target)?.len();
            debug!("Saved {} ({} bytes)", target.display(), bytes);
            Ok(DownloadOutcome::Downloaded {
                path: target,
                bytes,
            })
        }
        Ok(Ok(status)) => {
            discard(&partial);
            warn!("HTTP {} while downloading {}", status, url);
            Ok(DownloadOutcome::Failed {
                reason: format!("HTTP status {}", status),
            })
        }
        Ok(Err(e)) => {
            discard(&partial);
            warn!("Connection error for {}: {}", url, e);
            Ok(DownloadOutcome::Failed {
                reason: e.to_string(),
            })
        }
        Err(e) => {
            discard(&partial);
            Err(e.into())
        }
    }
}

fn partial_path(target: &Path) -> PathBuf {
    let mut name = target.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

fn discard(partial: &Path) {
    if let Err(e) = fs::remove_file(partial) {
        debug!("Could not remove {}: {}", partial.display(), e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::fetch::{FetchError, FetchResponse};
    use tempfile::TempDir;

    struct OneFile {
        status: u16,
    }

    impl ListingFetcher for OneFile {
        fn fetch(&self, _url: &str) -> std::result::Result<FetchResponse, FetchError> {
            Ok(FetchResponse {
                status: self.status,
                body: b"PK\x03\x04zip bytes".to_vec(),
            })
        }
    }

    struct Unreachable;

    impl ListingFetcher for Unreachable {
        fn fetch(&self, _url: &str) -> std::result::Result<FetchResponse, FetchError> {
            Err(FetchError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            )))
        }
    }

    #[test]
    fn test_file_name_from_url() {
        assert_eq!(
            file_name_from_url("https://host/FTP/2024/1T2024.zip"),
            Some("1T2024.zip")
        );
        assert_eq!(
            file_name_from_url("https://host/a/Relatorio_cadop.csv?x=1"),
            Some("Relatorio_cadop.csv")
        );
        assert_eq!(file_name_from_url("https://host/dir/"), None);
    }

    #[test]
    fn test_download_writes_file() {
        let temp_dir = TempDir::new().unwrap();
        let outcome =
            download_file(&OneFile { status: 200 }, "https://host/1T2024.zip", temp_dir.path())
                .unwrap();

        let target = temp_dir.path().join("1T2024.zip");
        assert_eq!(
            outcome,
            DownloadOutcome::Downloaded {
                path: target.clone(),
                bytes: 13
            }
        );
        assert_eq!(fs::read(&target).unwrap(), b"PK\x03\x04zip bytes");
        assert!(!temp_dir.path().join("1T2024.zip.part").exists());
    }

    #[test]
    fn test_existing_file_is_not_downloaded_again() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("1T2024.zip");
        fs::write(&target, b"old").unwrap();

        let outcome =
            download_file(&OneFile { status: 200 }, "https://host/1T2024.zip", temp_dir.path())
                .unwrap();

        assert_eq!(outcome, DownloadOutcome::AlreadyPresent { path: target.clone() });
        assert_eq!(fs::read(&target).unwrap(), b"old");
    }

    #[test]
    fn test_error_status_leaves_no_file() {
        let temp_dir = TempDir::new().unwrap();
        let outcome =
            download_file(&OneFile { status: 404 }, "https://host/1T2024.zip", temp_dir.path())
                .unwrap();

        assert!(matches!(outcome, DownloadOutcome::Failed { .. }));
        assert!(!temp_dir.path().join("1T2024.zip").exists());
        assert!(!temp_dir.path().join("1T2024.zip.part").exists());
    }

    #[test]
    fn test_connection_error_is_soft() {
        let temp_dir = TempDir::new().unwrap();
        let outcome =
            download_file(&Unreachable, "https://host/1T2024.zip", temp_dir.path()).unwrap();

        match outcome {
            DownloadOutcome::Failed { reason } => assert!(reason.contains("connection refused")),
            other => panic!("Expected failure, got {:?}", other),
        }
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }
}
