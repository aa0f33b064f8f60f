//! Per-sequence and aggregate statistics for FASTA, FASTQ, GenBank and EMBL
//! files, optionally gzip or bzip2 compressed.

pub mod cli;
pub mod core;
pub mod report;

pub use crate::core::error::{ProcessError, Result};
pub use crate::core::model::{Mode, ProcessingResult, SequenceRow};
pub use crate::core::processor::{IdFilter, ProcessConfig, process};
