//! Normalization pipeline for regulator statement files
//!
//! Turns a loosely structured frame into canonical records. The pieces are
//! kept separate so each heuristic can be tested on its own:
//! - [`field_parsers`] - total monetary parsing with a zero fallback
//! - [`column_mapping`] - order-sensitive fuzzy column lookup
//! - [`period`] - quarter/year extraction from archive names
//! - [`records`] - keyword filtering and mapping to the output schema

pub mod column_mapping;
pub mod field_parsers;
pub mod period;
pub mod records;

#[cfg(test)]
pub mod tests;

pub use column_mapping::{find_description_column, find_value_column};
pub use field_parsers::parse_monetary;
pub use period::extract_period;
pub use records::RecordNormalizer;
