//! Consolidated CSV writing
//!
//! All archives of a run append to one UTF-8, comma-delimited table. The
//! file is removed when the run starts, the header is written exactly once
//! (by the first archive that contributes rows) and later archives append
//! without touching what is already there.

use crate::constants::OUTPUT_HEADER;
use crate::error::Result;
use crate::models::NormalizedRecord;

use polars::prelude::*;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Append-only writer for the consolidated table
#[derive(Debug)]
pub struct ConsolidatedWriter {
    output_path: PathBuf,
    header_written: bool,
    rows_written: usize,
}

impl ConsolidatedWriter {
    /// Create a writer; nothing touches the disk until [`reset`](Self::reset)
    pub fn new(output_path: PathBuf) -> Self {
        Self {
            output_path,
            header_written: false,
            rows_written: 0,
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Start a fresh run: remove any previous output and make sure the
    /// output directory exists
    pub fn reset(&mut self) -> Result<()> {
        self.create_output_dir()?;
        if self.output_path.exists() {
            std::fs::remove_file(&self.output_path)?;
            debug!("Removed previous output {}", self.output_path.display());
        }
        self.header_written = false;
        self.rows_written = 0;
        Ok(())
    }

    /// Append one archive's records, writing the header first if this is
    /// the first contribution of the run. Returns the number of rows written.
    pub fn append(&mut self, records: &[NormalizedRecord]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut frame = records_to_frame(records)?;
        let mut file = if self.header_written {
            OpenOptions::new().append(true).open(&self.output_path)?
        } else {
            self.create_output_dir()?;
            File::create(&self.output_path)?
        };

        CsvWriter::new(&mut file)
            .include_header(!self.header_written)
            .with_separator(b',')
            .finish(&mut frame)?;

        self.header_written = true;
        self.rows_written += records.len();
        debug!(
            "Appended {} rows to {} ({} total)",
            records.len(),
            self.output_path.display(),
            self.rows_written
        );
        Ok(records.len())
    }

    /// Close the run. If no archive contributed, the output still gets its
    /// header so downstream readers always see the schema.
    pub fn finish(&mut self) -> Result<usize> {
        if !self.header_written {
            self.create_output_dir()?;
            let mut writer = ::csv::Writer::from_path(&self.output_path)?;
            writer.write_record(OUTPUT_HEADER)?;
            writer.flush()?;
            self.header_written = true;
        }
        Ok(self.rows_written)
    }

    fn create_output_dir(&self) -> Result<()> {
        if let Some(parent) = self.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

/// Records as a frame with the output column names and order
fn records_to_frame(records: &[NormalizedRecord]) -> Result<DataFrame> {
    let quarters: Vec<i32> = records.iter().map(|r| i32::from(r.quarter)).collect();
    let years: Vec<i32> = records.iter().map(|r| i32::from(r.year)).collect();
    let dates: Vec<Option<String>> = records.iter().map(|r| r.accounting_date.clone()).collect();
    let registries: Vec<Option<String>> = records.iter().map(|r| r.registry_id.clone()).collect();
    let descriptions: Vec<String> = records.iter().map(|r| r.description.clone()).collect();
    let values: Vec<f64> = records.iter().map(|r| r.value).collect();

    let [quarter, year, date, registry, description, value] = OUTPUT_HEADER;
    let frame = df!(
        quarter => quarters,
        year => years,
        date => dates,
        registry => registries,
        description => descriptions,
        value => values,
    )?;
    Ok(frame)
}
