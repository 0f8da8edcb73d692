//! Compression adapter
//!
//! Wraps the container bytes in a gzip stream (deflate family). Both
//! directions are fully buffered.

use crate::cancel::CancellationToken;
use crate::error::{LoafError, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{Read, Write};

/// Highest deflate level, used by default
pub const BEST_LEVEL: u32 = 9;

/// Chunk size for feeding the encoder and draining the decoder
const CHUNK: usize = 64 * 1024;

/// Compress `data` at `level` (0-9)
pub fn compress(data: &[u8], level: u32, token: &CancellationToken) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::new(level.min(BEST_LEVEL)));

    for chunk in data.chunks(CHUNK) {
        token.check()?;
        encoder
            .write_all(chunk)
            .map_err(|e| LoafError::CompressionFailed(format!("gzip write failed: {}", e)))?;
    }

    let compressed = encoder
        .finish()
        .map_err(|e| LoafError::CompressionFailed(format!("gzip finish failed: {}", e)))?;

    tracing::trace!(input = data.len(), output = compressed.len(), level, "compressed");
    Ok(compressed)
}

/// Decompress a complete gzip stream
pub fn decompress(data: &[u8], token: &CancellationToken) -> Result<Vec<u8>> {
    // An empty input is not a gzip stream
    if data.is_empty() {
        return Err(LoafError::DecompressionFailed(
            "empty compressed stream".to_string(),
        ));
    }

    let mut decoder = GzDecoder::new(data);
    let mut output = Vec::new();
    let mut chunk = vec![0u8; CHUNK];

    loop {
        token.check()?;
        let n = match decoder.read(&mut chunk) {
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(LoafError::DecompressionFailed(format!(
                    "gzip stream invalid: {}",
                    e
                )))
            }
        };
        if n == 0 {
            break;
        }
        output.extend_from_slice(&chunk[..n]);
    }

    Ok(output)
}
