//! Archive processing engine.
//!
//! Walks the raw store one archive at a time and drives each through
//! loading, column resolution, normalization and the consolidated writer.
//! Problems that only concern one archive (no period in its name, no data
//! file inside, unreadable file, no matching rows) skip it and the run goes
//! on. Anything that goes wrong once an archive's data is being normalized
//! ends the run; rows already appended stay in the output.

pub mod store;
pub mod writer;

#[cfg(test)]
pub mod tests;

use self::store::{DirectoryStore, RawStore, list_archives};
use self::writer::ConsolidatedWriter;

use crate::config::ProcessorConfig;
use crate::error::{ProcessorError, Result};
use crate::loader::{is_supported_data_file, load_frame};
use crate::models::{ArchiveReference, ArchiveSummary, ProcessingStats, SkipReason, UnitOutcome};
use crate::normalizer::{RecordNormalizer, extract_period};

use colored::*;
use std::io::{Cursor, Read, Seek};
use std::time::Instant;
use tracing::{debug, info, warn};
use zip::ZipArchive;

/// Sequential processor for one consolidation run
#[derive(Debug)]
pub struct ArchiveProcessor<S: RawStore = DirectoryStore> {
    store: S,
    normalizer: RecordNormalizer,
    writer: ConsolidatedWriter,
}

impl ArchiveProcessor<DirectoryStore> {
    /// Processor reading archives from `config.raw_dir`
    pub fn new(config: ProcessorConfig) -> Result<Self> {
        let store = DirectoryStore::new(config.raw_dir.clone());
        Self::with_store(config, store)
    }
}

impl<S: RawStore> ArchiveProcessor<S> {
    /// Processor reading archives from an arbitrary store
    pub fn with_store(config: ProcessorConfig, store: S) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            normalizer: RecordNormalizer::new(&config),
            writer: ConsolidatedWriter::new(config.output_path.clone()),
            store,
        })
    }

    /// Process every archive in the store into a fresh consolidated table
    pub fn process(&mut self) -> Result<ProcessingStats> {
        let start_time = Instant::now();
        println!("{}", "Starting archive consolidation".bright_green().bold());
        println!(
            "  {} {}",
            "Raw store:".bright_cyan(),
            self.store.location().display()
        );
        println!(
            "  {} {}",
            "Output:".bright_cyan(),
            self.writer.output_path().display()
        );

        self.writer.reset()?;

        let archives: Vec<ArchiveReference> = list_archives(&self.store)?
            .into_iter()
            .map(|name| ArchiveReference {
                path: self.store.location().join(&name),
                name,
            })
            .collect();

        if archives.is_empty() {
            return Err(ProcessorError::NoArchives {
                dir: self.store.location().to_path_buf(),
            });
        }

        println!(
            "\n{} {} archives...\n",
            "Processing".bright_yellow(),
            archives.len().to_string().bright_white().bold()
        );

        let mut stats = ProcessingStats {
            archives_found: archives.len(),
            output_path: self.writer.output_path().to_path_buf(),
            ..Default::default()
        };

        for archive in &archives {
            println!("{} {}", "Processing:".bright_cyan(), archive.name);

            match self.process_archive(archive) {
                Ok(UnitOutcome::Produced(summary)) => {
                    stats.archives_processed += 1;
                    stats.total_rows += summary.rows;
                    println!(
                        "  {} {} rows from {} (ref {})\n",
                        "->".bright_green(),
                        summary.rows.to_string().bright_white().bold(),
                        summary.data_file,
                        summary.period
                    );
                }
                Ok(UnitOutcome::Skipped(reason)) => {
                    stats.archives_skipped += 1;
                    warn!("Skipped {}: {}", archive.name, reason);
                    println!("  {} {}\n", "Skipped:".yellow(), reason);
                }
                Err(e) => {
                    eprintln!(
                        "{} {}: {}",
                        "Critical error in".bright_red().bold(),
                        archive.name,
                        e
                    );
                    return Err(e);
                }
            }
        }

        stats.total_rows = self.writer.finish()?;
        stats.processing_time_ms = start_time.elapsed().as_millis();

        println!("{}", "Processing complete".bright_green().bold());
        println!(
            "  {} {} processed, {} skipped, {} rows in {} ms",
            "Archives:".bright_cyan(),
            stats.archives_processed,
            stats.archives_skipped,
            stats.total_rows,
            stats.processing_time_ms
        );

        Ok(stats)
    }

    /// Run one archive end to end and append its records
    pub fn process_archive(
        &mut self,
        archive: &ArchiveReference,
    ) -> Result<UnitOutcome<ArchiveSummary>> {
        let Some(period) = extract_period(&archive.name) else {
            return Ok(UnitOutcome::Skipped(SkipReason::UnresolvedPeriod));
        };
        debug!("{} covers period {}", archive.name, period);

        let bytes = self.store.read(&archive.name)?;
        let mut zip = ZipArchive::new(Cursor::new(bytes)).map_err(|e| {
            ProcessorError::ArchiveFailed {
                archive: archive.name.clone(),
                reason: format!("cannot open archive: {}", e),
            }
        })?;

        let Some((index, data_file)) = first_data_entry(&zip) else {
            return Ok(UnitOutcome::Skipped(SkipReason::NoDataFile));
        };
        info!("{}: using data file {}", archive.name, data_file);

        let mut entry = zip.by_index(index)?;
        // The declared size comes from an untrusted header; let the buffer grow.
        let mut contents = Vec::new();
        entry.read_to_end(&mut contents)?;

        let Some(frame) = load_frame(&contents, &data_file) else {
            return Ok(UnitOutcome::Skipped(SkipReason::Unreadable { file: data_file }));
        };
        if frame.height() == 0 {
            return Ok(UnitOutcome::Skipped(SkipReason::EmptyFrame { file: data_file }));
        }

        let records = match self.normalizer.normalize(&frame, period, &archive.name)? {
            UnitOutcome::Produced(records) => records,
            UnitOutcome::Skipped(reason) => return Ok(UnitOutcome::Skipped(reason)),
        };

        let rows = self.writer.append(&records)?;
        Ok(UnitOutcome::Produced(ArchiveSummary {
            period,
            data_file,
            rows,
        }))
    }

}

/// First entry, in archive listing order, whose name the loader can read.
/// Only entry names are consulted; nothing is decompressed.
fn first_data_entry<R: Read + Seek>(zip: &ZipArchive<R>) -> Option<(usize, String)> {
    (0..zip.len()).find_map(|index| {
        zip.name_for_index(index)
            .filter(|name| is_supported_data_file(name))
            .map(|name| (index, name.to_string()))
    })
}
