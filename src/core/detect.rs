use crate::core::error::{ProcessError, Result};
use serde::Serialize;
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    None,
    Gzip,
    Bzip2,
}

impl Compression {
    pub fn as_str(self) -> &'static str {
        match self {
            Compression::None => "none",
            Compression::Gzip => "gzip",
            Compression::Bzip2 => "bzip2",
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeqFormat {
    Fasta,
    Fastq,
    GenBank,
    Embl,
}

impl SeqFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            SeqFormat::Fasta => "fasta",
            SeqFormat::Fastq => "fastq",
            SeqFormat::GenBank => "genbank",
            SeqFormat::Embl => "embl",
        }
    }

    pub fn has_quality(self) -> bool {
        self == SeqFormat::Fastq
    }
}

impl fmt::Display for SeqFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const COMPRESSION_SUFFIXES: [(&str, Compression); 4] = [
    (".gz", Compression::Gzip),
    (".gzip", Compression::Gzip),
    (".bz2", Compression::Bzip2),
    (".bzip2", Compression::Bzip2),
];

const FORMAT_SUFFIXES: [(&str, SeqFormat); 9] = [
    (".fa", SeqFormat::Fasta),
    (".fasta", SeqFormat::Fasta),
    (".fna", SeqFormat::Fasta),
    (".fq", SeqFormat::Fastq),
    (".fastq", SeqFormat::Fastq),
    (".gb", SeqFormat::GenBank),
    (".gbk", SeqFormat::GenBank),
    (".genbank", SeqFormat::GenBank),
    (".embl", SeqFormat::Embl),
];

pub fn detect_compression(filename: &str) -> Compression {
    let name = filename.to_ascii_lowercase();
    COMPRESSION_SUFFIXES
        .iter()
        .find(|(suffix, _)| name.ends_with(suffix))
        .map(|&(_, kind)| kind)
        .unwrap_or(Compression::None)
}

/// Resolves the sequence format from the filename alone, after removing a
/// single trailing compression suffix. No content sniffing.
pub fn detect_format(filename: &str) -> Result<SeqFormat> {
    let name = filename.to_ascii_lowercase();
    let stem = strip_compression_suffix(&name);
    FORMAT_SUFFIXES
        .iter()
        .find(|(suffix, _)| stem.ends_with(suffix))
        .map(|&(_, format)| format)
        .ok_or_else(|| ProcessError::UnsupportedFormat {
            filename: filename.to_string(),
        })
}

pub fn detect(filename: &str) -> Result<(SeqFormat, Compression)> {
    let format = detect_format(filename)?;
    Ok((format, detect_compression(filename)))
}

/// Filename with the compression suffix and the format suffix removed, used
/// as the default sample name.
pub fn sample_stem(filename: &str) -> &str {
    let lower = filename.to_ascii_lowercase();
    let mut end = strip_compression_suffix(&lower).len();
    if let Some((suffix, _)) = FORMAT_SUFFIXES
        .iter()
        .find(|(suffix, _)| lower[..end].ends_with(suffix))
    {
        end -= suffix.len();
    }
    &filename[..end]
}

fn strip_compression_suffix(name: &str) -> &str {
    for (suffix, _) in COMPRESSION_SUFFIXES {
        if let Some(stem) = name.strip_suffix(suffix) {
            return stem;
        }
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gzip_fasta() {
        let (format, compression) = detect("sample.fasta.gz").unwrap();
        assert_eq!(format, SeqFormat::Fasta);
        assert_eq!(compression, Compression::Gzip);
    }

    #[test]
    fn plain_fastq() {
        let (format, compression) = detect("reads.fq").unwrap();
        assert_eq!(format, SeqFormat::Fastq);
        assert_eq!(compression, Compression::None);
    }

    #[test]
    fn unknown_suffix_is_rejected() {
        let err = detect("x.txt").unwrap_err();
        assert!(matches!(err, ProcessError::UnsupportedFormat { ref filename } if filename == "x.txt"));
    }

    #[test]
    fn bare_compression_suffix_is_rejected() {
        assert!(detect_format("archive.gz").is_err());
        assert_eq!(detect_compression("archive.gz"), Compression::Gzip);
    }

    #[test]
    fn suffixes_are_case_insensitive() {
        assert_eq!(detect_format("Genome.GBK.BZ2").unwrap(), SeqFormat::GenBank);
        assert_eq!(detect_compression("Genome.GBK.BZ2"), Compression::Bzip2);
        assert_eq!(detect_format("entry.EMBL").unwrap(), SeqFormat::Embl);
        assert_eq!(detect_compression("reads.fastq.gzip"), Compression::Gzip);
        assert_eq!(detect_compression("reads.fastq.bzip2"), Compression::Bzip2);
    }

    #[test]
    fn format_must_be_the_last_suffix_after_compression() {
        assert!(detect_format("reads.fq.txt").is_err());
        assert!(detect_format("reads.fq.gz.gz").is_err());
        assert_eq!(detect_format("contigs.fna").unwrap(), SeqFormat::Fasta);
    }

    #[test]
    fn sample_stem_drops_both_suffixes() {
        assert_eq!(sample_stem("Sample.FASTA.gz"), "Sample");
        assert_eq!(sample_stem("reads.fq"), "reads");
        assert_eq!(sample_stem("notes.txt"), "notes.txt");
    }
}
