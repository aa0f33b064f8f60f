use crate::core::detect::SeqFormat;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessError>;

/// Failures that end processing of a single input file.
///
/// An input that yields no qualifying records is not an error; the result
/// simply carries zeroed totals.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Filename suffix is not in the recognized format table.
    #[error("unsupported format: {filename}")]
    UnsupportedFormat { filename: String },

    /// The format parser (or the decompressor feeding it) rejected the stream.
    #[error("failed to parse {format} input: {message}")]
    Parse { format: SeqFormat, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProcessError {
    pub fn parse(format: SeqFormat, message: impl Into<String>) -> Self {
        ProcessError::Parse {
            format,
            message: message.into(),
        }
    }
}
