use crate::archive::format::{padding_for, EntryHeader, BLOCK_SIZE, END_MARKER_BLOCKS};
use crate::cancel::CancellationToken;
use crate::error::Result;
use std::time::{SystemTime, UNIX_EPOCH};

/// Chunk size used when copying blob data into the container
const COPY_CHUNK: usize = 64 * 1024;

/// Default header mode for written entries
pub const DEFAULT_FILE_MODE: u32 = 0o644;

/// Serializes a single named blob into an in-memory container
///
/// Layout: one 512-byte header, the data, zero padding to a block boundary,
/// then two all-zero blocks.
#[derive(Debug, Clone)]
pub struct ContainerWriter {
    modified_time: Option<u64>,
    mode: u32,
}

impl ContainerWriter {
    pub fn new() -> Self {
        Self {
            modified_time: None,
            mode: DEFAULT_FILE_MODE,
        }
    }

    /// Pin the header modification time instead of using the current time
    pub fn with_modified_time(mut self, secs: u64) -> Self {
        self.modified_time = Some(secs);
        self
    }

    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = mode;
        self
    }

    /// Build the container for `name` / `data`
    pub fn write(&self, name: &str, data: &[u8], token: &CancellationToken) -> Result<Vec<u8>> {
        let modified_time = self.modified_time.unwrap_or_else(now_secs);
        let header = EntryHeader::new(name, data.len() as u64, modified_time, self.mode);
        let block = header.to_bytes()?;

        let padding = padding_for(data.len() as u64);
        let total = BLOCK_SIZE + data.len() + padding + END_MARKER_BLOCKS * BLOCK_SIZE;
        let mut out = Vec::with_capacity(total);

        out.extend_from_slice(&block);
        for chunk in data.chunks(COPY_CHUNK) {
            token.check()?;
            out.extend_from_slice(chunk);
        }
        out.resize(out.len() + padding, 0);
        out.resize(out.len() + END_MARKER_BLOCKS * BLOCK_SIZE, 0);

        tracing::trace!(name, size = data.len(), container_len = out.len(), "container written");
        Ok(out)
    }
}

impl Default for ContainerWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn now_secs() -> u64 {
    // A clock before the epoch is treated as the epoch itself
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
