//! Display-ready projection of a [`ProcessingResult`].
//!
//! Everything a report writer draws comes from here; writers do no
//! arithmetic of their own beyond layout.

use crate::core::model::{ProcessingResult, SequenceRow};

pub const HISTOGRAM_BINS: usize = 30;
/// Row count above which the per-record plots are skipped.
pub const MAX_PLOT_ROWS: usize = 50_000;
pub const LARGE_DATASET_NOTICE: &str = "Dataset too large for detailed plotting.";

#[derive(Clone, Debug, PartialEq)]
pub struct Metric {
    pub label: &'static str,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    /// Left edge of the first bin.
    pub min: f64,
    pub bin_width: f64,
    pub counts: Vec<u64>,
}

impl Histogram {
    pub fn max(&self) -> f64 {
        self.min + self.bin_width * self.counts.len() as f64
    }

    pub fn bin_center(&self, i: usize) -> f64 {
        self.min + self.bin_width * (i as f64 + 0.5)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Plots {
    Drawn {
        gc_histogram: Histogram,
        /// (Length, GC_content) per row.
        length_vs_gc: Vec<(f64, f64)>,
    },
    Skipped {
        rows: usize,
        notice: &'static str,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Detail<'r> {
    pub rows: &'r [SequenceRow],
    pub has_quality: bool,
    pub plots: Plots,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewModel<'r> {
    pub title: String,
    pub metrics: Vec<Metric>,
    /// Two-bar summary chart: average length and average GC.
    pub summary_bars: Vec<(&'static str, f64)>,
    /// Present only when the result carries per-record rows.
    pub detail: Option<Detail<'r>>,
}

impl<'r> ViewModel<'r> {
    pub fn build(result: &'r ProcessingResult) -> Self {
        let metrics = vec![
            Metric {
                label: "Format",
                value: result.format.as_str().to_ascii_uppercase(),
            },
            Metric {
                label: "Compression",
                value: result.compression.as_str().to_ascii_uppercase(),
            },
            Metric {
                label: "Sequences",
                value: result.total_sequences.to_string(),
            },
            Metric {
                label: "Total Bases",
                value: fmt_int(result.total_bases),
            },
        ];

        let summary_bars = vec![
            ("Average Length", result.average_length),
            ("Average GC", result.average_gc_content),
        ];

        let detail = result.sequences.as_deref().map(|rows| Detail {
            rows,
            has_quality: result.has_quality(),
            plots: build_plots(rows),
        });

        Self {
            title: result.filename.clone(),
            metrics,
            summary_bars,
            detail,
        }
    }
}

fn build_plots(rows: &[SequenceRow]) -> Plots {
    if rows.len() > MAX_PLOT_ROWS {
        return Plots::Skipped {
            rows: rows.len(),
            notice: LARGE_DATASET_NOTICE,
        };
    }
    let gc: Vec<f64> = rows.iter().map(|r| r.gc_content).collect();
    Plots::Drawn {
        gc_histogram: histogram(&gc, HISTOGRAM_BINS),
        length_vs_gc: rows
            .iter()
            .map(|r| (r.length as f64, r.gc_content))
            .collect(),
    }
}

/// Equal-width bins over the observed range. The maximum value lands in the
/// last bin; a zero-width range is widened to one unit of `1 / bins` per bin.
pub fn histogram(values: &[f64], bins: usize) -> Histogram {
    let bins = bins.max(1);
    let mut counts = vec![0u64; bins];
    if values.is_empty() {
        return Histogram {
            min: 0.0,
            bin_width: 1.0 / bins as f64,
            counts,
        };
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    let bin_width = if span > 1e-12 {
        span / bins as f64
    } else {
        1.0 / bins as f64
    };
    for &v in values {
        let idx = ((v - min) / bin_width).floor() as usize;
        counts[idx.min(bins - 1)] += 1;
    }
    Histogram {
        min,
        bin_width,
        counts,
    }
}

pub fn fmt_int(v: u64) -> String {
    let s = v.to_string();
    let mut out = String::with_capacity(s.len() + s.len() / 3);
    let len = s.len();
    for (i, ch) in s.chars().enumerate() {
        if i != 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::detect::{Compression, SeqFormat};

    fn result_with_rows(rows: Option<Vec<SequenceRow>>) -> ProcessingResult {
        let n = rows.as_ref().map(|r| r.len() as u64).unwrap_or(0);
        ProcessingResult {
            filename: "reads.fastq.gz".into(),
            format: SeqFormat::Fastq,
            compression: Compression::Gzip,
            total_sequences: n,
            total_bases: 1_234_567,
            average_length: 150.0,
            average_gc_content: 0.42,
            filtered: false,
            sequences: rows,
        }
    }

    fn row(i: usize, gc: f64) -> SequenceRow {
        SequenceRow {
            id: format!("r{i}"),
            length: 100 + i as u64,
            gc_content: gc,
            avg_quality: Some(30.0),
        }
    }

    #[test]
    fn metrics_are_upper_cased_and_grouped() {
        let result = result_with_rows(None);
        let view = ViewModel::build(&result);
        let values: Vec<&str> = view.metrics.iter().map(|m| m.value.as_str()).collect();
        assert_eq!(values, ["FASTQ", "GZIP", "0", "1,234,567"]);
        assert_eq!(
            view.summary_bars,
            vec![("Average Length", 150.0), ("Average GC", 0.42)]
        );
        assert!(view.detail.is_none());
    }

    #[test]
    fn rows_produce_plots() {
        let rows: Vec<SequenceRow> = (0..10).map(|i| row(i, i as f64 / 10.0)).collect();
        let result = result_with_rows(Some(rows));
        let view = ViewModel::build(&result);
        let detail = view.detail.unwrap();
        assert_eq!(detail.rows.len(), 10);
        assert!(detail.has_quality);
        match detail.plots {
            Plots::Drawn {
                gc_histogram,
                length_vs_gc,
            } => {
                assert_eq!(gc_histogram.counts.len(), HISTOGRAM_BINS);
                assert_eq!(gc_histogram.counts.iter().sum::<u64>(), 10);
                assert_eq!(length_vs_gc.len(), 10);
                assert_eq!(length_vs_gc[3], (103.0, 0.3));
            }
            Plots::Skipped { .. } => panic!("expected plots"),
        }
    }

    #[test]
    fn large_row_sets_skip_plots() {
        let rows: Vec<SequenceRow> = (0..MAX_PLOT_ROWS + 1).map(|i| row(i, 0.5)).collect();
        let result = result_with_rows(Some(rows));
        let view = ViewModel::build(&result);
        let detail = view.detail.unwrap();
        assert_eq!(detail.rows.len(), MAX_PLOT_ROWS + 1);
        assert_eq!(
            detail.plots,
            Plots::Skipped {
                rows: MAX_PLOT_ROWS + 1,
                notice: LARGE_DATASET_NOTICE
            }
        );
    }

    #[test]
    fn exactly_at_limit_still_plots() {
        let rows: Vec<SequenceRow> = (0..MAX_PLOT_ROWS).map(|i| row(i, 0.5)).collect();
        let result = result_with_rows(Some(rows));
        let view = ViewModel::build(&result);
        assert!(matches!(view.detail.unwrap().plots, Plots::Drawn { .. }));
    }

    #[test]
    fn histogram_edges() {
        let h = histogram(&[0.0, 0.5, 1.0], 30);
        assert_eq!(h.counts[0], 1);
        assert_eq!(h.counts[15], 1);
        assert_eq!(h.counts[29], 1);
        assert!((h.max() - 1.0).abs() < 1e-9);

        let flat = histogram(&[0.4, 0.4], 30);
        assert_eq!(flat.counts[0], 2);
        assert_eq!(flat.min, 0.4);

        let empty = histogram(&[], 30);
        assert_eq!(empty.counts.iter().sum::<u64>(), 0);
    }

    #[test]
    fn fmt_int_groups_thousands() {
        assert_eq!(fmt_int(0), "0");
        assert_eq!(fmt_int(999), "999");
        assert_eq!(fmt_int(1000), "1,000");
        assert_eq!(fmt_int(12_345_678), "12,345,678");
    }
}
