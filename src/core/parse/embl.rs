//! Identifier and sequence extraction for EMBL flat files.
//!
//! Records run from an `ID` line to `//`, with bases under `SQ`. Everything
//! else in a record (features, references, comments) is skipped.

use super::{RecordParser, Records, SeqRecord};
use crate::core::detect::SeqFormat;
use crate::core::error::{ProcessError, Result};
use std::io::BufRead;

pub struct EmblParser;

impl RecordParser for EmblParser {
    fn format(&self) -> SeqFormat {
        SeqFormat::Embl
    }

    fn records<'a>(&self, source: Box<dyn BufRead + 'a>) -> Records<'a> {
        Box::new(EmblRecords::new(source))
    }
}

struct Header {
    name: String,
    accession: Option<String>,
    version: Option<String>,
}

impl Header {
    fn into_id(self) -> String {
        self.version.or(self.accession).unwrap_or(self.name)
    }
}

pub struct EmblRecords<R: BufRead> {
    reader: R,
    line: String,
    line_no: usize,
    done: bool,
}

impl<R: BufRead> EmblRecords<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            line_no: 0,
            done: false,
        }
    }

    fn read_line(&mut self) -> Result<bool> {
        self.line.clear();
        let n = self
            .reader
            .read_line(&mut self.line)
            .map_err(|e| self.error(format!("read failed: {e}")))?;
        if n > 0 {
            self.line_no += 1;
        }
        Ok(n > 0)
    }

    fn error(&self, message: impl Into<String>) -> ProcessError {
        ProcessError::parse(
            SeqFormat::Embl,
            format!("line {}: {}", self.line_no, message.into()),
        )
    }

    fn read_record(&mut self) -> Result<Option<SeqRecord>> {
        loop {
            if !self.read_line()? {
                return Ok(None);
            }
            if !self.line.trim().is_empty() {
                break;
            }
        }

        let mut header = parse_id_line(&self.line).ok_or_else(|| self.error("expected ID line"))?;

        let mut seq = Vec::new();
        let mut in_sequence = false;
        loop {
            if !self.read_line()? {
                return Err(self.error(format!(
                    "unexpected end of input inside record {}",
                    header.name
                )));
            }
            let line = self.line.trim_end();
            if line.starts_with("//") {
                break;
            }
            if in_sequence {
                push_bases(&mut seq, line);
            } else if let Some(rest) = field(line, "AC") {
                if header.accession.is_none() {
                    header.accession = first_accession(rest);
                }
            } else if let Some(rest) = field(line, "SV") {
                if header.version.is_none() {
                    header.version = first_accession(rest);
                }
            } else if line.starts_with("SQ") {
                in_sequence = true;
            }
        }

        Ok(Some(SeqRecord {
            id: header.into_id(),
            seq,
            qual: None,
        }))
    }
}

impl<R: BufRead> Iterator for EmblRecords<R> {
    type Item = Result<SeqRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Value of a keyword line, when the line starts with exactly that keyword.
fn field<'l>(line: &'l str, keyword: &str) -> Option<&'l str> {
    let rest = line.strip_prefix(keyword)?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}

fn first_accession(value: &str) -> Option<String> {
    value
        .split(|c: char| c == ';' || c.is_whitespace())
        .find(|s| !s.is_empty())
        .map(|s| s.to_string())
}

// ID   X56734; SV 1; linear; mRNA; STD; PLN; 1859 BP.
fn parse_id_line(line: &str) -> Option<Header> {
    let rest = field(line.trim_end(), "ID")?;
    let mut fields = rest.split(';').map(str::trim);
    let name = fields
        .next()
        .and_then(|f| f.split_whitespace().next())
        .unwrap_or("")
        .to_string();
    let version = fields
        .find_map(|f| f.strip_prefix("SV "))
        .map(|sv| format!("{}.{}", name, sv.trim()));
    Some(Header {
        name,
        accession: None,
        version,
    })
}

fn push_bases(seq: &mut Vec<u8>, line: &str) {
    seq.extend(
        line.bytes()
            .filter(u8::is_ascii_alphabetic)
            .map(|b| b.to_ascii_uppercase()),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMBL: &str = "\
ID   X56734; SV 1; linear; mRNA; STD; PLN; 8 BP.
XX
AC   X56734; S46826;
XX
DE   Trifolium repens mRNA for non-cyanogenic beta-glucosidase
FT   source          1..8
SQ   Sequence 8 BP; 2 A; 2 C; 2 G; 2 T; 0 other;
     aacc ggtt                                                             8
//
ID   OLDSTYLE   standard; DNA; HUM; 4 BP.
AC   J00001;
SQ   Sequence 4 BP;
     atat                                                                  4
//
";

    fn parse(text: &'static str) -> Vec<Result<SeqRecord>> {
        EmblParser.records(Box::new(text.as_bytes())).collect()
    }

    #[test]
    fn ids_use_sequence_version_then_accession() {
        let records: Vec<SeqRecord> = parse(EMBL).into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "X56734.1");
        assert_eq!(records[0].seq, b"AACCGGTT");
        assert_eq!(records[1].id, "J00001");
        assert_eq!(records[1].seq, b"ATAT");
    }

    #[test]
    fn separate_sv_line_sets_the_version() {
        let text = "ID   A1   standard; DNA;\nAC   A1;\nSV   A1.3\nSQ   Sequence\n     gc\n//\n";
        let records = parse(text);
        assert_eq!(records[0].as_ref().unwrap().id, "A1.3");
    }

    #[test]
    fn id_name_is_the_last_resort() {
        let records = parse("ID   ONLYNAME   standard;\nSQ\n     ac\n//\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].as_ref().unwrap().id, "ONLYNAME");
    }

    #[test]
    fn blank_input_has_no_records() {
        assert!(parse("").is_empty());
        assert!(parse("\n\n").is_empty());
    }

    #[test]
    fn content_outside_a_record_is_rejected() {
        let out = parse(">seq1\nACGT\n");
        assert_eq!(out.len(), 1);
        let err = out.into_iter().next().unwrap().unwrap_err();
        assert!(err.to_string().contains("expected ID line"));
    }

    #[test]
    fn unterminated_record_is_rejected() {
        let out = parse("ID   A1; SV 2; linear;\nSQ   Sequence\n     acgt\n");
        assert_eq!(out.len(), 1);
        let err = out.into_iter().next().unwrap().unwrap_err();
        assert!(matches!(err, ProcessError::Parse { format: SeqFormat::Embl, .. }));
        assert!(err.to_string().contains("unexpected end of input"));
    }

    #[test]
    fn iteration_stops_after_an_error() {
        let mut records = EmblRecords::new("garbage\nID   A\n//\n".as_bytes());
        assert!(records.next().unwrap().is_err());
        assert!(records.next().is_none());
    }
}
