use crate::core::model::ProcessingResult;
use crate::core::view::{Plots, ViewModel};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub fn write(path: &Path, result: &ProcessingResult) -> Result<()> {
    let mut w = BufWriter::new(File::create(path).with_context(|| "create summary.txt failed")?);
    write_summary(&mut w, result)?;
    w.flush()?;
    Ok(())
}

pub fn write_summary(w: &mut dyn Write, result: &ProcessingResult) -> Result<()> {
    let view = ViewModel::build(result);

    writeln!(w, "#Measure\tValue")?;
    writeln!(w, "Filename\t{}", result.filename)?;
    for metric in &view.metrics {
        writeln!(w, "{}\t{}", metric.label, metric.value)?;
    }
    for (label, value) in &view.summary_bars {
        writeln!(w, "{}\t{:.2}", label, value)?;
    }
    writeln!(w, "Filtered\t{}", if result.filtered { "yes" } else { "no" })?;
    match &view.detail {
        None => writeln!(w, "Rows\tomitted (statistics only)")?,
        Some(detail) => {
            writeln!(w, "Rows\t{}", detail.rows.len())?;
            if let Plots::Skipped { notice, .. } = &detail.plots {
                writeln!(w, "Plots\t{}", notice)?;
            }
        }
    }
    Ok(())
}
