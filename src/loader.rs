//! Format-agnostic loading of statement data files.
//!
//! The regulator publishes the same statements as `.xlsx` workbooks or as
//! delimited text (`.csv`/`.txt`) in whatever encoding the release happened
//! to use. The loader tries the known variants in a fixed order and returns
//! the first frame that parses, with every column kept as raw text so the
//! column resolver sees names exactly as published. Failure to read is an
//! expected, recoverable outcome and is reported as `None`.

use calamine::{Data, Reader, Xlsx};
use chrono::NaiveTime;
use encoding_rs::{UTF_8, WINDOWS_1252};
use polars::prelude::{Column, DataFrame, NamedFrom, PlSmallStr, PolarsError, Series};
use std::collections::HashMap;
use std::io::Cursor;
use thiserror::Error;
use tracing::{debug, warn};

/// Parser family selected from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Spreadsheet,
    Delimited,
}

impl DataFormat {
    /// Format for a file name, by extension (case-insensitive)
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let extension = file_name.rsplit_once('.')?.1.to_lowercase();
        match extension.as_str() {
            "xlsx" => Some(DataFormat::Spreadsheet),
            "csv" | "txt" => Some(DataFormat::Delimited),
            _ => None,
        }
    }
}

/// Whether an archive entry is a data file the loader can read
pub fn is_supported_data_file(name: &str) -> bool {
    DataFormat::from_file_name(name).is_some()
}

/// Text encodings tried for delimited files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Latin1,
    Utf8,
}

/// Delimited-text trials, in order: first success wins
pub const DELIMITED_TRIALS: [(u8, TextEncoding); 2] =
    [(b';', TextEncoding::Latin1), (b',', TextEncoding::Utf8)];

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("unsupported file extension: {0}")]
    UnsupportedFormat(String),

    #[error("bytes are not valid {0:?}")]
    Encoding(TextEncoding),

    #[error("CSV parsing failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("semicolon parse produced a single comma-separated column")]
    WrongDelimiter,

    #[error("row {row} has {found} fields, header has {expected}")]
    TooManyFields {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("file has no header row")]
    NoHeader,

    #[error("spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("frame construction failed: {0}")]
    Polars(#[from] PolarsError),

    #[error("all parser trials failed")]
    AllTrialsFailed,
}

/// Load `bytes` as a frame, or `None` when no parser accepts them
pub fn load_frame(bytes: &[u8], file_name: &str) -> Option<DataFrame> {
    match try_load(bytes, file_name) {
        Ok(frame) => {
            debug!(
                "Loaded {}: {} rows x {} columns",
                file_name,
                frame.height(),
                frame.width()
            );
            Some(frame)
        }
        Err(e) => {
            warn!("Unsupported or unreadable data file {}: {}", file_name, e);
            None
        }
    }
}

/// Load `bytes` as a frame, reporting why it failed
pub fn try_load(bytes: &[u8], file_name: &str) -> Result<DataFrame, LoadError> {
    match DataFormat::from_file_name(file_name) {
        Some(DataFormat::Spreadsheet) => load_spreadsheet(bytes),
        Some(DataFormat::Delimited) => {
            for (delimiter, encoding) in DELIMITED_TRIALS {
                match load_delimited(bytes, delimiter, encoding) {
                    Ok(frame) => return Ok(frame),
                    Err(e) => debug!(
                        "{}: trial ({:?}, {:?}) failed: {}",
                        file_name, delimiter as char, encoding, e
                    ),
                }
            }
            Err(LoadError::AllTrialsFailed)
        }
        None => Err(LoadError::UnsupportedFormat(file_name.to_string())),
    }
}

/// Parse delimited text with one delimiter/encoding combination
pub fn load_delimited(
    bytes: &[u8],
    delimiter: u8,
    encoding: TextEncoding,
) -> Result<DataFrame, LoadError> {
    let text = decode(bytes, encoding)?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(LoadError::NoHeader);
    }
    if headers.len() == 1 && headers[0].contains(other_delimiter(delimiter)) {
        return Err(LoadError::WrongDelimiter);
    }

    // Short rows are padded with nulls; rows with extra fields reject the trial.
    let mut columns: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        if record.len() > headers.len() {
            return Err(LoadError::TooManyFields {
                row: index + 1,
                found: record.len(),
                expected: headers.len(),
            });
        }
        for (i, column) in columns.iter_mut().enumerate() {
            column.push(
                record
                    .get(i)
                    .filter(|field| !field.is_empty())
                    .map(str::to_string),
            );
        }
    }

    build_frame(headers, columns)
}

/// The delimiter of the other trial, used to spot a wrong-delimiter parse
fn other_delimiter(delimiter: u8) -> char {
    if delimiter == b';' { ',' } else { ';' }
}

/// Read the first worksheet; its first row is the header
pub fn load_spreadsheet(bytes: &[u8]) -> Result<DataFrame, LoadError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes.to_vec()))
        .map_err(|e| LoadError::Spreadsheet(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::Spreadsheet("workbook has no worksheets".to_string()))?
        .map_err(|e| LoadError::Spreadsheet(e.to_string()))?;

    let mut rows = range.rows();
    let header_row = rows.next().ok_or(LoadError::NoHeader)?;
    let headers: Vec<String> = header_row
        .iter()
        .enumerate()
        .map(|(i, cell)| cell_text(cell).unwrap_or_else(|| format!("Unnamed: {}", i)))
        .collect();

    let mut columns: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for row in rows {
        for (i, column) in columns.iter_mut().enumerate() {
            column.push(row.get(i).and_then(cell_text));
        }
    }

    build_frame(headers, columns)
}

fn decode(bytes: &[u8], encoding: TextEncoding) -> Result<String, LoadError> {
    match encoding {
        TextEncoding::Latin1 => {
            let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
            Ok(text.into_owned())
        }
        TextEncoding::Utf8 => {
            let text = UTF_8
                .decode_without_bom_handling_and_without_replacement(bytes)
                .ok_or(LoadError::Encoding(encoding))?;
            Ok(text.trim_start_matches('\u{feff}').to_string())
        }
    }
}

/// Cell as text; date cells become `YYYY-MM-DD` (with the time when it is not midnight)
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(s.clone()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) if value.time() == NaiveTime::MIN => {
                Some(value.format("%Y-%m-%d").to_string())
            }
            Some(value) => Some(value.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => Some(cell.to_string()),
        },
        other => Some(other.to_string()),
    }
}

/// Build an all-text frame, renaming repeated headers `X`, `X.1`, `X.2`
fn build_frame(
    headers: Vec<String>,
    columns: Vec<Vec<Option<String>>>,
) -> Result<DataFrame, LoadError> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let frame_columns: Vec<Column> = headers
        .into_iter()
        .zip(columns)
        .map(|(header, values)| {
            let count = seen.entry(header.clone()).or_insert(0);
            let name = if *count == 0 {
                header
            } else {
                format!("{}.{}", header, count)
            };
            *count += 1;
            Column::from(Series::new(PlSmallStr::from(name.as_str()), values))
        })
        .collect();

    Ok(DataFrame::new(frame_columns)?)
}
