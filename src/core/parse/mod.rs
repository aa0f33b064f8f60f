//! Record parsing, one adapter per supported format.
//!
//! The record processor only sees [`SeqRecord`] values; which library or
//! reader produced them is an adapter detail.

use crate::core::detect::SeqFormat;
use crate::core::error::Result;
use std::io::{self, BufRead};

mod embl;
mod fasta;
mod fastq;
mod genbank;

pub use embl::{EmblParser, EmblRecords};
pub use fasta::FastaParser;
pub use fastq::FastqParser;
pub use genbank::GenBankParser;

#[derive(Clone, Debug, PartialEq)]
pub struct SeqRecord {
    pub id: String,
    pub seq: Vec<u8>,
    pub qual: Option<Vec<u8>>,
}

pub type Records<'a> = Box<dyn Iterator<Item = Result<SeqRecord>> + 'a>;

pub trait RecordParser {
    fn format(&self) -> SeqFormat;

    /// Consumes the text stream once, front to back.
    fn records<'a>(&self, source: Box<dyn BufRead + 'a>) -> Records<'a>;
}

pub fn parser_for(format: SeqFormat) -> Box<dyn RecordParser> {
    match format {
        SeqFormat::Fasta => Box::new(FastaParser),
        SeqFormat::Fastq => Box::new(FastqParser),
        SeqFormat::GenBank => Box::new(GenBankParser),
        SeqFormat::Embl => Box::new(EmblParser),
    }
}

/// First whitespace-delimited token of a header line.
pub(crate) fn first_token(header: &str) -> &str {
    header.split_whitespace().next().unwrap_or("")
}

/// Consumes whitespace-only lines at the front of the stream, leaving the
/// first line with content untouched.
pub(crate) fn skip_blank_lines<R: BufRead + ?Sized>(source: &mut R) -> io::Result<()> {
    loop {
        let buf = source.fill_buf()?;
        if buf.is_empty() {
            return Ok(());
        }
        let blank = buf.iter().take_while(|b| b.is_ascii_whitespace()).count();
        if blank == buf.len() {
            source.consume(blank);
            continue;
        }
        let line_start = buf[..blank]
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |i| i + 1);
        source.consume(line_start);
        return Ok(());
    }
}
