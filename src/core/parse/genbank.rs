use super::{RecordParser, Records, SeqRecord};
use crate::core::detect::SeqFormat;
use crate::core::error::ProcessError;
use gb_io::reader::SeqReader;
use gb_io::seq::Seq;
use std::io::BufRead;

/// GenBank records via `gb-io`. The identifier is `VERSION`, then the first
/// `ACCESSION`, then the `LOCUS` name.
pub struct GenBankParser;

impl RecordParser for GenBankParser {
    fn format(&self) -> SeqFormat {
        SeqFormat::GenBank
    }

    fn records<'a>(&self, source: Box<dyn BufRead + 'a>) -> Records<'a> {
        let format = self.format();
        Box::new(SeqReader::new(source).map(move |item| {
            let seq = item.map_err(|e| ProcessError::parse(format, e.to_string()))?;
            let id = record_id(&seq);
            // CON records only reference other entries; their bases are undefined.
            if seq.seq.is_empty() && seq.contig.is_some() {
                return Err(ProcessError::parse(
                    format,
                    format!("record {} has no sequence data (CONTIG record)", id),
                ));
            }
            Ok(SeqRecord {
                id,
                seq: seq.seq,
                qual: None,
            })
        }))
    }
}

fn record_id(seq: &Seq) -> String {
    let token = |v: &Option<String>| {
        v.as_deref()
            .and_then(|s| s.split_whitespace().next())
            .map(str::to_string)
    };
    token(&seq.version)
        .or_else(|| token(&seq.accession))
        .or_else(|| token(&seq.name))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const GENBANK: &str = "\
LOCUS       SCU49845                  12 bp    DNA     linear   PLN 21-JUN-1999
DEFINITION  Saccharomyces cerevisiae TCP1-beta gene, partial cds.
ACCESSION   U49845
VERSION     U49845.1
FEATURES             Location/Qualifiers
     source          1..12
                     /organism=\"Saccharomyces cerevisiae\"
ORIGIN
        1 gatcctccat at
//
LOCUS       NOVERSION                  4 bp    DNA     linear   PLN 21-JUN-1999
DEFINITION  No version line.
ACCESSION   X00001 X00002
ORIGIN
        1 ggcc
//
";

    const CONTIG: &str = "\
LOCUS       CON00001                 100 bp    DNA     linear   CON 01-JAN-2000
DEFINITION  Assembly scaffold.
ACCESSION   CON00001
VERSION     CON00001.1
CONTIG      join(AB000001.1:1..100)
//
";

    fn parse(text: &'static str) -> Vec<crate::core::error::Result<SeqRecord>> {
        GenBankParser.records(Box::new(text.as_bytes())).collect()
    }

    #[test]
    fn ids_prefer_version_then_accession() {
        let records: Vec<SeqRecord> = parse(GENBANK).into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "U49845.1");
        assert_eq!(records[0].seq.len(), 12);
        assert_eq!(records[1].id, "X00001");
        assert!(records[1].seq.eq_ignore_ascii_case(b"GGCC"));
    }

    #[test]
    fn locus_name_is_the_last_resort() {
        let seq = Seq {
            name: Some("ONLYNAME".to_string()),
            ..Seq::empty()
        };
        assert_eq!(record_id(&seq), "ONLYNAME");
    }

    #[test]
    fn contig_record_is_a_parse_failure() {
        let out = parse(CONTIG);
        assert!(matches!(
            out.first(),
            Some(Err(ProcessError::Parse { format: SeqFormat::GenBank, .. }))
        ));
    }

    #[test]
    fn empty_input_has_no_records() {
        assert!(parse("").is_empty());
    }
}
