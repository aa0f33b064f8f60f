use crate::core::detect::{self, Compression, SeqFormat};
use crate::core::error::Result;
use crate::core::gc;
use crate::core::io::open_text;
use crate::core::model::{Mode, ProcessingResult, SequenceRow, round2};
use crate::core::parse::{SeqRecord, parser_for};
use std::collections::HashSet;

const PHRED_OFFSET: i64 = 33;

/// Exact-match allow-list of record identifiers.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct IdFilter {
    ids: HashSet<String>,
}

impl IdFilter {
    /// Parses a comma-separated list, trimming each token. Empty tokens are
    /// kept, so `","` yields a filter that only matches an empty identifier.
    /// `None` for an empty argument.
    pub fn parse(text: &str) -> Option<Self> {
        if text.is_empty() {
            return None;
        }
        Self::from_ids(text.split(','))
    }

    pub fn from_ids<I, S>(ids: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ids: HashSet<String> = ids
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .collect();
        if ids.is_empty() { None } else { Some(Self { ids }) }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct ProcessConfig {
    pub mode: Mode,
    pub filter: Option<IdFilter>,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Full,
            filter: None,
        }
    }
}

/// Running totals over the records that pass the filter.
///
/// GC is accumulated as a sum of per-record ratios, so the reported average
/// is an unweighted mean across records, not a length-weighted fraction.
#[derive(Clone, Debug)]
pub struct Accumulator {
    total_sequences: u64,
    total_bases: u64,
    total_gc: f64,
    rows: Option<Vec<SequenceRow>>,
}

impl Accumulator {
    pub fn new(mode: Mode) -> Self {
        Self {
            total_sequences: 0,
            total_bases: 0,
            total_gc: 0.0,
            rows: match mode {
                Mode::Full => Some(Vec::new()),
                Mode::StatsOnly => None,
            },
        }
    }

    pub fn push(&mut self, record: &SeqRecord) {
        let length = record.seq.len() as u64;
        let gc_content = gc::gc_content(&record.seq);
        self.total_sequences += 1;
        self.total_bases += length;
        self.total_gc += gc_content;
        if let Some(rows) = self.rows.as_mut() {
            rows.push(SequenceRow {
                id: record.id.clone(),
                length,
                gc_content,
                avg_quality: record.qual.as_deref().map(mean_quality),
            });
        }
    }

    pub fn finish(
        self,
        filename: &str,
        format: SeqFormat,
        compression: Compression,
        filtered: bool,
    ) -> ProcessingResult {
        let (average_length, average_gc_content) = if self.total_sequences == 0 {
            (0.0, 0.0)
        } else {
            let n = self.total_sequences as f64;
            (
                round2(self.total_bases as f64 / n),
                round2(self.total_gc / n),
            )
        };
        ProcessingResult {
            filename: filename.to_string(),
            format,
            compression,
            total_sequences: self.total_sequences,
            total_bases: self.total_bases,
            average_length,
            average_gc_content,
            filtered,
            sequences: self.rows,
        }
    }
}

/// Arithmetic mean of Phred+33 scores; 0 for an empty quality string.
pub fn mean_quality(qual: &[u8]) -> f64 {
    if qual.is_empty() {
        return 0.0;
    }
    let sum: i64 = qual.iter().map(|&b| b as i64 - PHRED_OFFSET).sum();
    sum as f64 / qual.len() as f64
}

/// Runs one file through detection, decompression, parsing and
/// aggregation. Parser errors end the run; there is no partial result.
pub fn process(content: &[u8], filename: &str, cfg: &ProcessConfig) -> Result<ProcessingResult> {
    let (format, compression) = detect::detect(filename)?;
    let source = open_text(content, compression, format)?;
    let parser = parser_for(format);

    let mut acc = Accumulator::new(cfg.mode);
    for record in parser.records(source) {
        let record = record?;
        if let Some(filter) = &cfg.filter {
            if !filter.contains(&record.id) {
                continue;
            }
        }
        acc.push(&record);
    }

    Ok(acc.finish(filename, format, compression, cfg.filter.is_some()))
}
