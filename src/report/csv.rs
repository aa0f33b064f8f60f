use crate::core::model::ProcessingResult;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub fn write(path: &Path, result: &ProcessingResult) -> Result<()> {
    let mut w = BufWriter::new(
        File::create(path).with_context(|| format!("create {} failed", path.display()))?,
    );
    write_rows(&mut w, result)?;
    w.flush()?;
    Ok(())
}

/// Row table as CSV: `ID,Length,GC_content` plus `Avg_quality` for FASTQ.
pub fn write_rows(w: &mut dyn Write, result: &ProcessingResult) -> Result<()> {
    let with_quality = result.has_quality();
    if with_quality {
        writeln!(w, "ID,Length,GC_content,Avg_quality")?;
    } else {
        writeln!(w, "ID,Length,GC_content")?;
    }
    for row in result.rows() {
        write!(
            w,
            "{},{},{}",
            quote_field(&row.id),
            row.length,
            fmt_float(row.gc_content)
        )?;
        if with_quality {
            write!(w, ",{}", fmt_float(row.avg_quality.unwrap_or(0.0)))?;
        }
        writeln!(w)?;
    }
    Ok(())
}

/// Shortest round-trip form, keeping a `.0` on integral values.
fn fmt_float(v: f64) -> String {
    let s = v.to_string();
    if v.is_finite() && !s.contains(['.', 'e', 'E']) {
        format!("{s}.0")
    } else {
        s
    }
}

fn quote_field(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
