//! Record normalization: keyword filtering and mapping to the output schema
//!
//! Takes a loaded frame (all columns as raw text), keeps the rows whose
//! description mentions one of the configured keywords and maps each kept
//! row onto a [`NormalizedRecord`] tagged with the archive's period.

use super::column_mapping::{find_description_column, find_exact_column, find_value_column};
use super::field_parsers::{non_empty, parse_monetary};
use crate::config::ProcessorConfig;
use crate::error::{ProcessorError, Result};
use crate::models::{NormalizedRecord, PeriodTag, SkipReason, UnitOutcome};
use polars::prelude::{DataFrame, DataType};
use tracing::debug;

/// Keyword filter and schema mapping for one data file at a time
#[derive(Debug, Clone)]
pub struct RecordNormalizer {
    keywords: Vec<String>,
    description_pattern: String,
    value_patterns: Vec<String>,
    date_column: String,
    registry_column: String,
}

impl RecordNormalizer {
    pub fn new(config: &ProcessorConfig) -> Self {
        Self {
            keywords: config
                .keywords
                .iter()
                .filter(|k| !k.trim().is_empty())
                .map(|k| k.to_uppercase())
                .collect(),
            description_pattern: config.description_pattern.clone(),
            value_patterns: config.value_patterns.clone(),
            date_column: config.date_column.clone(),
            registry_column: config.registry_column.clone(),
        }
    }

    /// Normalize every matching row of `frame`.
    ///
    /// A missing description column or an empty keyword match skips the
    /// archive. A missing value column once rows have matched is fatal.
    pub fn normalize(
        &self,
        frame: &DataFrame,
        period: PeriodTag,
        archive: &str,
    ) -> Result<UnitOutcome<Vec<NormalizedRecord>>> {
        let columns: Vec<String> = frame
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();

        let Some(description_column) = find_description_column(&columns, &self.description_pattern)
        else {
            return Ok(UnitOutcome::Skipped(SkipReason::MissingDescriptionColumn));
        };

        let descriptions = text_values(frame, description_column)?;
        let kept: Vec<usize> = descriptions
            .iter()
            .enumerate()
            .filter(|(_, text)| {
                text.as_deref()
                    .is_some_and(|t| matches_keywords(t, &self.keywords))
            })
            .map(|(row, _)| row)
            .collect();

        debug!(
            "{}: {} of {} rows match keywords {:?}",
            archive,
            kept.len(),
            descriptions.len(),
            self.keywords
        );

        if kept.is_empty() {
            return Ok(UnitOutcome::Skipped(SkipReason::NoMatchingRows));
        }

        let value_column = find_value_column(&columns, &self.value_patterns).ok_or_else(|| {
            ProcessorError::ValueColumnMissing {
                archive: archive.to_string(),
                columns: columns.clone(),
            }
        })?;
        let values = text_values(frame, value_column)?;

        let dates = optional_text_values(frame, &columns, &self.date_column)?;
        let registries = optional_text_values(frame, &columns, &self.registry_column)?;

        let records = kept
            .into_iter()
            .map(|row| NormalizedRecord {
                quarter: period.quarter,
                year: period.year,
                accounting_date: cell(&dates, row),
                registry_id: cell(&registries, row),
                description: descriptions[row].clone().unwrap_or_default(),
                value: parse_monetary(values[row].as_deref()),
            })
            .collect();

        Ok(UnitOutcome::Produced(records))
    }
}

/// Case-insensitive substring match against any keyword (keywords upper-case)
pub fn matches_keywords(text: &str, keywords: &[String]) -> bool {
    let upper = text.to_uppercase();
    keywords.iter().any(|k| upper.contains(k.as_str()))
}

/// Column contents as owned text, nulls preserved
fn text_values(frame: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let series = frame
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::String)?;
    let values = series
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();
    Ok(values)
}

fn optional_text_values(
    frame: &DataFrame,
    columns: &[String],
    name: &str,
) -> Result<Option<Vec<Option<String>>>> {
    match find_exact_column(columns, name) {
        Some(column) => Ok(Some(text_values(frame, column)?)),
        None => Ok(None),
    }
}

fn cell(values: &Option<Vec<Option<String>>>, row: usize) -> Option<String> {
    values
        .as_ref()
        .and_then(|v| non_empty(v[row].as_deref()))
        .map(str::to_string)
}
