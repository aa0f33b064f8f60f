use crate::core::model::ProcessingResult;
use crate::core::view::ViewModel;
use crate::report::html;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use svg2pdf::usvg;
use svg2pdf::{ConversionOptions, PageOptions};

/// Writes one PDF per chart into `dir/figures`, returning the written paths.
pub fn write(dir: &Path, result: &ProcessingResult) -> Result<Vec<PathBuf>> {
    let figures_dir = dir.join("figures");
    fs::create_dir_all(&figures_dir)
        .with_context(|| format!("failed to create {}", figures_dir.display()))?;

    let view = ViewModel::build(result);
    let mut written = Vec::new();
    for chart in html::charts(&view)? {
        let pdf = svg_to_pdf(&chart.svg)
            .with_context(|| format!("failed to convert chart {}", chart.name))?;
        let path = figures_dir.join(format!("{}.pdf", chart.name));
        fs::write(&path, pdf).with_context(|| format!("failed to write {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}

fn svg_to_pdf(svg: &str) -> Result<Vec<u8>> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    let tree =
        usvg::Tree::from_str(svg, &opt).map_err(|e| anyhow::anyhow!("usvg parse failed: {e}"))?;
    let pdf = svg2pdf::to_pdf(&tree, ConversionOptions::default(), PageOptions::default())
        .map_err(|e| anyhow::anyhow!("svg2pdf conversion failed: {e}"))?;
    Ok(pdf)
}
