use super::{RecordParser, Records, SeqRecord, first_token, skip_blank_lines};
use crate::core::detect::SeqFormat;
use crate::core::error::ProcessError;
use bio::io::fasta;
use std::io::BufRead;
use std::iter;

pub struct FastaParser;

impl RecordParser for FastaParser {
    fn format(&self) -> SeqFormat {
        SeqFormat::Fasta
    }

    fn records<'a>(&self, mut source: Box<dyn BufRead + 'a>) -> Records<'a> {
        let format = self.format();
        // Blank lines ahead of the first header are tolerated.
        if let Err(e) = skip_blank_lines(&mut source) {
            return Box::new(iter::once(Err(ProcessError::parse(format, e.to_string()))));
        }
        let records = fasta::Reader::new(source).records();
        Box::new(records.map(move |item| {
            let record = item.map_err(|e| ProcessError::parse(format, e.to_string()))?;
            // `id()` is empty when the header starts with whitespace; the
            // identifier is then the first token of the description.
            let header = match record.desc() {
                Some(desc) => format!("{} {}", record.id(), desc),
                None => record.id().to_string(),
            };
            Ok(SeqRecord {
                id: first_token(&header).to_string(),
                seq: record.seq().to_vec(),
                qual: None,
            })
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &'static str) -> Vec<crate::core::error::Result<SeqRecord>> {
        FastaParser.records(Box::new(text.as_bytes())).collect()
    }

    #[test]
    fn multi_line_records() {
        let out = parse(">seq1 first record\nACGT\nGG\n>seq2\nTTTT\n");
        let records: Vec<SeqRecord> = out.into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "seq1");
        assert_eq!(records[0].seq, b"ACGTGG");
        assert_eq!(records[1].id, "seq2");
        assert_eq!(records[1].seq, b"TTTT");
        assert!(records.iter().all(|r| r.qual.is_none()));
    }

    #[test]
    fn header_with_leading_space() {
        let out = parse("> seq1 desc\nACGT\n");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].as_ref().unwrap().id, "seq1");
    }

    #[test]
    fn leading_blank_lines_are_skipped() {
        let out = parse("\n  \n>seq1\nACGT\n");
        assert_eq!(out.len(), 1);
        let record = out[0].as_ref().unwrap();
        assert_eq!(record.id, "seq1");
        assert_eq!(record.seq, b"ACGT");
    }

    #[test]
    fn empty_input_has_no_records() {
        assert!(parse("").is_empty());
        assert!(parse("\n\n").is_empty());
    }

    #[test]
    fn missing_header_is_a_parse_failure() {
        let out = parse("ACGT\n");
        assert!(matches!(
            out.first(),
            Some(Err(ProcessError::Parse { format: SeqFormat::Fasta, .. }))
        ));
    }
}
