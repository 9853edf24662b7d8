//! Test suite for the archive processing engine
//!
//! Archives are assembled in memory with the zip writer and served from a
//! [`MemoryStore`]; the consolidated table goes to a temporary directory.

mod archive_tests;

use crate::config::ProcessorConfig;
use crate::processor::ArchiveProcessor;
use crate::error::Result;
use crate::processor::store::RawStore;
use std::collections::BTreeMap;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

/// In-memory raw store, keyed by archive name
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.entries.insert(name.into(), bytes);
    }
}

impl RawStore for MemoryStore {
    fn location(&self) -> &Path {
        Path::new("<memory>")
    }

    fn list(&self) -> Result<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }

    fn read(&self, name: &str) -> Result<Vec<u8>> {
        self.entries.get(name).cloned().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("archive not in store: {}", name),
            )
            .into()
        })
    }
}

pub const STATEMENT_HEADER: &str = "DATA;REG_ANS;CD_CONTA_CONTABIL;DESCRICAO;VL_SALDO_FINAL";

/// Zip archive holding the given (name, contents) entries in order
pub fn build_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut buf = Vec::new();
    {
        let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        for (name, contents) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(contents).unwrap();
        }
        zip.finish().unwrap();
    }
    buf
}

/// Semicolon statement file with the given (description, value) rows
pub fn statement_csv(rows: &[(&str, &str)]) -> Vec<u8> {
    let mut text = format!("{}\n", STATEMENT_HEADER);
    for (i, (description, value)) in rows.iter().enumerate() {
        text.push_str(&format!(
            "2024-03-31;{};{};{};{}\n",
            100000 + i,
            41 + i,
            description,
            value
        ));
    }
    text.into_bytes()
}

pub fn output_path(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("processed").join("consolidado.csv")
}

pub fn processor_for(store: MemoryStore, temp_dir: &TempDir) -> ArchiveProcessor<MemoryStore> {
    let config = ProcessorConfig::default().with_output_path(output_path(temp_dir));
    ArchiveProcessor::with_store(config, store).unwrap()
}

/// Output rows as (header, records)
pub fn read_output(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = ::csv::Reader::from_path(path).unwrap();
    let header = reader
        .headers()
        .unwrap()
        .iter()
        .map(str::to_string)
        .collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect();
    (header, rows)
}

pub fn header_line_count(path: &Path) -> usize {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter(|line| line.starts_with("trimestre,"))
        .count()
}
