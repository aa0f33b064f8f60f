use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "genesis-qc",
    version,
    about = "Sequence statistics for FASTA, FASTQ, GenBank and EMBL files"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    Run(RunArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Input file (.fa/.fasta/.fna/.fq/.fastq/.gb/.gbk/.genbank/.embl, optionally .gz/.bz2)
    pub input: PathBuf,

    #[arg(long)]
    pub out: PathBuf,

    #[arg(long, value_enum, default_value_t = ModeArg::Full)]
    pub mode: ModeArg,

    /// Comma-separated record IDs to keep
    #[arg(long)]
    pub filter_ids: Option<String>,

    #[arg(long)]
    pub sample_name: Option<String>,

    #[arg(long, default_value_t = false)]
    pub no_html: bool,

    #[arg(long, default_value_t = false)]
    pub no_zip: bool,

    #[arg(long, default_value_t = false)]
    pub export_pdf: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ModeArg {
    #[value(name = "full")]
    Full,
    #[value(name = "stats")]
    Stats,
}
