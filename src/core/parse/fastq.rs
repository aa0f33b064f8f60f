use super::{RecordParser, Records, SeqRecord, first_token};
use crate::core::detect::SeqFormat;
use crate::core::error::ProcessError;
use seq_io::fastq::Reader;
use std::io::BufRead;

/// Four-line FASTQ records. Zero-length reads (an empty sequence line with an
/// empty quality line) are valid and come through as empty records.
pub struct FastqParser;

impl RecordParser for FastqParser {
    fn format(&self) -> SeqFormat {
        SeqFormat::Fastq
    }

    fn records<'a>(&self, source: Box<dyn BufRead + 'a>) -> Records<'a> {
        let format = self.format();
        let records = Reader::new(source).into_records();
        Box::new(records.map(move |item| {
            let record = item.map_err(|e| ProcessError::parse(format, e.to_string()))?;
            let header = std::str::from_utf8(&record.head)
                .map_err(|e| ProcessError::parse(format, format!("header is not UTF-8: {e}")))?;
            let id = first_token(header);
            if id.is_empty() {
                return Err(ProcessError::parse(format, "record header has no identifier"));
            }
            if record.seq.len() != record.qual.len() {
                return Err(ProcessError::parse(
                    format,
                    format!(
                        "sequence and quality lengths differ for {} ({} vs {})",
                        id,
                        record.seq.len(),
                        record.qual.len()
                    ),
                ));
            }
            Ok(SeqRecord {
                id: id.to_string(),
                seq: record.seq,
                qual: Some(record.qual),
            })
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &'static str) -> Vec<crate::core::error::Result<SeqRecord>> {
        FastqParser.records(Box::new(text.as_bytes())).collect()
    }

    #[test]
    fn triples_with_quality() {
        let out = parse("@r1 lane=1\nACGT\n+\nIIII\n@r2\nGG\n+\n!!\n");
        let records: Vec<SeqRecord> = out.into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "r1");
        assert_eq!(records[0].seq, b"ACGT");
        assert_eq!(records[0].qual.as_deref(), Some(&b"IIII"[..]));
        assert_eq!(records[1].id, "r2");
        assert_eq!(records[1].qual.as_deref(), Some(&b"!!"[..]));
    }

    #[test]
    fn zero_length_reads_are_kept() {
        let out = parse("@r1\n\n+\n\n@r2\nAC\n+\nII\n");
        let records: Vec<SeqRecord> = out.into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "r1");
        assert!(records[0].seq.is_empty());
        assert_eq!(records[0].qual.as_deref(), Some(&b""[..]));
        assert_eq!(records[1].seq, b"AC");
    }

    #[test]
    fn leading_space_in_header_is_skipped() {
        let out = parse("@ r7 extra\nA\n+\nI\n");
        assert_eq!(out[0].as_ref().unwrap().id, "r7");
    }

    #[test]
    fn length_mismatch_is_a_parse_failure() {
        let out = parse("@r1\nACGT\n+\nII\n");
        assert!(matches!(
            out.first(),
            Some(Err(ProcessError::Parse { format: SeqFormat::Fastq, .. }))
        ));
    }

    #[test]
    fn fasta_content_is_rejected() {
        let out = parse(">r1\nACGT\n");
        assert!(matches!(out.first(), Some(Err(ProcessError::Parse { .. }))));
    }
}
