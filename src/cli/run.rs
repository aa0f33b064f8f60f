use crate::cli::args::{Cli, Commands, ModeArg, RunArgs};
use crate::core::detect;
use crate::core::io::InputBuffer;
use crate::core::model::{Mode, ProcessingResult};
use crate::core::processor::{self, IdFilter, ProcessConfig};
use crate::report;
use anyhow::{Context, Result, bail};
use clap::Parser;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

pub struct RunOutput {
    pub result: ProcessingResult,
    pub out_dir: PathBuf,
    pub files: Vec<PathBuf>,
    pub zip: Option<PathBuf>,
}

pub fn entry() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => run(args).map(|_| ()),
    }
}

pub fn run(args: RunArgs) -> Result<RunOutput> {
    let stats = stats_enabled();
    let t0 = Instant::now();

    stage(stats, "preflight", || {
        if args.input.as_os_str() == "-" {
            bail!("stdin is not supported; provide a sequence file path");
        }
        if !args.input.is_file() {
            bail!("input file not found: {}", args.input.display());
        }
        Ok(())
    })?;

    let file_name = args
        .input
        .file_name()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
        .context("failed to determine input filename")?;

    let sample_name = match &args.sample_name {
        Some(s) => s.clone(),
        None => detect::sample_stem(&file_name).to_string(),
    };
    if sample_name.is_empty() {
        bail!("failed to determine sample name from {}", file_name);
    }

    let cfg = ProcessConfig {
        mode: match args.mode {
            ModeArg::Full => Mode::Full,
            ModeArg::Stats => Mode::StatsOnly,
        },
        filter: args.filter_ids.as_deref().and_then(IdFilter::parse),
    };

    let t_read = Instant::now();
    let input = InputBuffer::open(&args.input)?;
    stage_done(stats, "read", t_read);

    let t_process = Instant::now();
    let result = processor::process(input.bytes(), &file_name, &cfg)
        .with_context(|| format!("error processing file {}", file_name))?;
    stage_done(stats, "process", t_process);
    if stats {
        eprintln!(
            "GENESIS_QC_STATS input={} bytes={} format={} compression={} sequences={} bases={}",
            args.input.display(),
            input.len(),
            result.format,
            result.compression,
            result.total_sequences,
            result.total_bases
        );
    }

    let t_out = Instant::now();
    let out_dir = args.out.join(format!("{}_genesisqc", sample_name));
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("failed to create output dir {}", out_dir.display()))?;
    stage_done(stats, "mkdir", t_out);

    let mut files = Vec::new();

    let summary_path = out_dir.join("summary.txt");
    let t_summary = Instant::now();
    report::summary_txt::write(&summary_path, &result)
        .with_context(|| format!("failed to write {}", summary_path.display()))?;
    stage_done(stats, "summary", t_summary);
    files.push(summary_path);

    let json_path = out_dir.join(format!("{}_processed.json", file_name));
    let t_json = Instant::now();
    report::json::write(&json_path, &result)?;
    stage_done(stats, "json", t_json);
    files.push(json_path);

    if result.sequences.is_some() {
        let csv_path = out_dir.join(format!("{}_processed.csv", file_name));
        let t_csv = Instant::now();
        report::csv::write(&csv_path, &result)
            .with_context(|| format!("failed to write {}", csv_path.display()))?;
        stage_done(stats, "csv", t_csv);
        files.push(csv_path);
    }

    if !args.no_html {
        let html_path = out_dir.join("report.html");
        let t_html = Instant::now();
        let ctx = report::html::ReportContext {
            input_bytes: input.len() as u64,
        };
        report::html::write(&html_path, &result, &ctx)
            .with_context(|| format!("failed to write {}", html_path.display()))?;
        stage_done(stats, "html", t_html);
        files.push(html_path);
    }

    if args.export_pdf {
        let t_pdf = Instant::now();
        let figures = report::pdf::write(&out_dir, &result)
            .with_context(|| "failed to write PDF figures")?;
        stage_done(stats, "pdf", t_pdf);
        files.extend(figures);
    }

    let zip = if args.no_zip {
        None
    } else {
        let t_zip = Instant::now();
        let zip_path = report::zip::write_zip(&args.out, &out_dir)
            .with_context(|| "failed to create zip output")?;
        stage_done(stats, "zip", t_zip);
        if stats {
            let zip_size = fs::metadata(&zip_path).map(|m| m.len()).unwrap_or(0);
            eprintln!(
                "GENESIS_QC_STATS output zip={} bytes={}",
                zip_path.display(),
                zip_size
            );
        }
        Some(zip_path)
    };

    if stats {
        eprintln!("GENESIS_QC_STATS output_dir={}", out_dir.display());
        eprintln!("GENESIS_QC_STATS total={}", fmt_dur(t0.elapsed()));
    }

    Ok(RunOutput {
        result,
        out_dir,
        files,
        zip,
    })
}

fn stats_enabled() -> bool {
    matches!(env::var("GENESIS_QC_STATS").as_deref(), Ok("1"))
}

fn stage<F>(stats: bool, name: &str, f: F) -> Result<()>
where
    F: FnOnce() -> Result<()>,
{
    let t = Instant::now();
    let res = f();
    if stats {
        eprintln!("GENESIS_QC_STATS stage={} time={}", name, fmt_dur(t.elapsed()));
    }
    res
}

fn stage_done(stats: bool, name: &str, t: Instant) {
    if stats {
        eprintln!("GENESIS_QC_STATS stage={} time={}", name, fmt_dur(t.elapsed()));
    }
}

fn fmt_dur(d: Duration) -> String {
    if d.as_secs_f64() < 1.0 {
        format!("{}ms", d.as_millis())
    } else {
        format!("{:.3}s", d.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_switch_units_at_one_second() {
        assert_eq!(fmt_dur(Duration::from_millis(250)), "250ms");
        assert_eq!(fmt_dur(Duration::from_millis(1500)), "1.500s");
    }
}
