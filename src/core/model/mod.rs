use crate::core::detect::{Compression, SeqFormat};
use serde::Serialize;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mode {
    Full,
    StatsOnly,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SequenceRow {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Length")]
    pub length: u64,
    #[serde(rename = "GC_content")]
    pub gc_content: f64,
    #[serde(rename = "Avg_quality", skip_serializing_if = "Option::is_none")]
    pub avg_quality: Option<f64>,
}

/// Outcome of processing one input file.
///
/// `sequences` is present exactly when the run was not stats-only; averages
/// are 0 when no record qualified.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProcessingResult {
    pub filename: String,
    pub format: SeqFormat,
    pub compression: Compression,
    pub total_sequences: u64,
    pub total_bases: u64,
    pub average_length: f64,
    pub average_gc_content: f64,
    pub filtered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequences: Option<Vec<SequenceRow>>,
}

impl ProcessingResult {
    pub fn rows(&self) -> &[SequenceRow] {
        self.sequences.as_deref().unwrap_or(&[])
    }

    pub fn has_quality(&self) -> bool {
        self.format.has_quality()
    }
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
