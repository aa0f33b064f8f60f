use crate::core::model::ProcessingResult;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub fn write(path: &Path, result: &ProcessingResult) -> Result<()> {
    let json = to_pretty(result)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Pretty-printed result with 2-space indentation.
pub fn to_pretty(result: &ProcessingResult) -> Result<String> {
    serde_json::to_string_pretty(result).with_context(|| "failed to serialize result")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::detect::{Compression, SeqFormat};
    use crate::core::model::SequenceRow;

    #[test]
    fn pretty_output_mirrors_result_shape() {
        let result = ProcessingResult {
            filename: "reads.fq.bz2".into(),
            format: SeqFormat::Fastq,
            compression: Compression::Bzip2,
            total_sequences: 1,
            total_bases: 4,
            average_length: 4.0,
            average_gc_content: 0.5,
            filtered: true,
            sequences: Some(vec![SequenceRow {
                id: "r1".into(),
                length: 4,
                gc_content: 0.5,
                avg_quality: Some(40.0),
            }]),
        };
        let json = to_pretty(&result).unwrap();
        assert!(json.starts_with("{\n  \"filename\": \"reads.fq.bz2\",\n  \"format\": \"fastq\""));
        assert!(json.contains("\"compression\": \"bzip2\""));
        assert!(json.contains("\"filtered\": true"));
        assert!(json.contains("\"sequences\": [\n    {\n      \"ID\": \"r1\""));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["total_sequences"], 1);
        assert_eq!(value["sequences"][0]["Avg_quality"], 40.0);
    }
}
