//! Raw store access for downloaded archives
//!
//! The raw store is a flat directory of `.zip` archives. Processing only
//! needs two capabilities from it: listing names and reading bytes.

use crate::constants::ARCHIVE_EXTENSION;
use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Source of archives for one run
pub trait RawStore {
    /// Where the archives live, for messages
    fn location(&self) -> &Path;

    /// Names of all entries in the store
    fn list(&self) -> Result<Vec<String>>;

    /// Full contents of one entry
    fn read(&self, name: &str) -> Result<Vec<u8>>;
}

/// Archive names in processing order: `.zip` only (case-insensitive), sorted
pub fn list_archives<S: RawStore + ?Sized>(store: &S) -> Result<Vec<String>> {
    let suffix = format!(".{}", ARCHIVE_EXTENSION);
    let mut names: Vec<String> = store
        .list()?
        .into_iter()
        .filter(|name| name.to_lowercase().ends_with(&suffix))
        .collect();
    names.sort();
    Ok(names)
}

/// Raw store backed by a directory on disk
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    dir: PathBuf,
}

impl DirectoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl RawStore for DirectoryStore {
    fn location(&self) -> &Path {
        &self.dir
    }

    fn list(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            debug!("Raw store {} does not exist", self.dir.display());
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in WalkDir::new(&self.dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(std::io::Error::from)?;
            if entry.file_type().is_file() {
                names.push(entry.file_name().to_string_lossy().to_string());
            }
        }
        debug!("Found {} files in {}", names.len(), self.dir.display());
        Ok(names)
    }

    fn read(&self, name: &str) -> Result<Vec<u8>> {
        Ok(std::fs::read(self.dir.join(name))?)
    }
}
