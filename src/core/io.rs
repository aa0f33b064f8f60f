use crate::core::detect::{Compression, SeqFormat};
use crate::core::error::{ProcessError, Result};
use anyhow::Context;
use bzip2::read::MultiBzDecoder;
use flate2::read::MultiGzDecoder;
use memmap2::Mmap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// The whole input file, held in memory for the duration of one run.
pub enum InputBuffer {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl InputBuffer {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let file =
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        let len = file
            .metadata()
            .with_context(|| format!("failed to stat {}", path.display()))?
            .len();
        if len == 0 {
            return Ok(InputBuffer::Owned(Vec::new()));
        }
        // SAFETY: read-only file mapping.
        let mmap = unsafe { Mmap::map(&file) }.with_context(|| "mmap failed")?;
        Ok(InputBuffer::Mapped(mmap))
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            InputBuffer::Mapped(mmap) => &mmap[..],
            InputBuffer::Owned(data) => data.as_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Forward-only text stream over the raw bytes, decompressed as needed.
///
/// Uncompressed input is validated as UTF-8 up front; compressed input is
/// decoded lazily and any corruption surfaces from the parser as a parse
/// failure.
pub fn open_text<'a>(
    bytes: &'a [u8],
    compression: Compression,
    format: SeqFormat,
) -> Result<Box<dyn BufRead + 'a>> {
    let reader: Box<dyn BufRead + 'a> = match compression {
        Compression::Gzip => Box::new(BufReader::new(MultiGzDecoder::new(bytes))),
        Compression::Bzip2 => Box::new(BufReader::new(MultiBzDecoder::new(bytes))),
        Compression::None => {
            std::str::from_utf8(bytes).map_err(|e| {
                ProcessError::parse(format, format!("input is not valid UTF-8: {e}"))
            })?;
            Box::new(bytes)
        }
    };
    Ok(reader)
}
