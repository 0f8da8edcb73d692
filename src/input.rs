//! Input sources for envelope creation

use crate::cancel::CancellationToken;
use crate::error::{LoafError, Result};
use std::fmt;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::PathBuf;

/// Where the bytes for a new envelope come from
pub enum InputSource {
    /// Free text; the blob gets the configured default name
    Text(String),
    /// In-memory bytes with their own name
    Bytes { name: String, data: Vec<u8> },
    /// A file on disk; the blob is named after the final path component
    File(PathBuf),
    /// Any readable stream with a name
    Reader {
        name: String,
        reader: Box<dyn Read + Send>,
    },
}

impl InputSource {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn bytes(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self::Bytes {
            name: name.into(),
            data: data.into(),
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    pub fn reader(name: impl Into<String>, reader: impl Read + Send + 'static) -> Self {
        Self::Reader {
            name: name.into(),
            reader: Box::new(reader),
        }
    }

    /// Obtain the name and a readable stream
    ///
    /// `default_name` is used for text input. Fails with
    /// [`LoafError::InputUnavailable`] when a file cannot be opened.
    pub fn open(self, default_name: &str) -> Result<(String, Box<dyn Read + Send>)> {
        match self {
            Self::Text(text) => Ok((
                default_name.to_string(),
                Box::new(Cursor::new(text.into_bytes())),
            )),
            Self::Bytes { name, data } => Ok((name, Box::new(Cursor::new(data)))),
            Self::File(path) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| default_name.to_string());
                let file = File::open(&path).map_err(|e| {
                    LoafError::InputUnavailable(format!("{}: {}", path.display(), e))
                })?;
                Ok((name, Box::new(file)))
            }
            Self::Reader { name, reader } => Ok((name, reader)),
        }
    }
}

impl fmt::Debug for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(&text.len()).finish(),
            Self::Bytes { name, data } => f
                .debug_struct("Bytes")
                .field("name", name)
                .field("len", &data.len())
                .finish(),
            Self::File(path) => f.debug_tuple("File").field(path).finish(),
            Self::Reader { name, .. } => f.debug_struct("Reader").field("name", name).finish(),
        }
    }
}

/// Drain `reader` into memory, checking for cancellation between chunks
pub(crate) fn read_to_end(
    reader: &mut dyn Read,
    token: &CancellationToken,
) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    let mut chunk = vec![0u8; 64 * 1024];

    loop {
        token.check()?;
        match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => data.extend_from_slice(&chunk[..n]),
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(LoafError::InputUnavailable(e.to_string())),
        }
    }

    Ok(data)
}
