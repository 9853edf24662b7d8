//! Test suite for the record normalizer
//!
//! Frames are built in memory with the same shape the loader produces:
//! every column is text, blanks are nulls.


use crate::config::ProcessorConfig;
use crate::models::PeriodTag;
use crate::normalizer::RecordNormalizer;

pub fn first_quarter_2024() -> PeriodTag {
    PeriodTag {
        quarter: 1,
        year: 2024,
    }
}

pub fn default_normalizer() -> RecordNormalizer {
    RecordNormalizer::new(&ProcessorConfig::default())
}
