use crate::archive::format::{is_zero_block, padding_for, EntryHeader, BLOCK_SIZE};
use crate::cancel::CancellationToken;
use crate::error::Result;
use std::io::Read;

/// Chunk size used when pulling blob data out of the container
const READ_CHUNK: usize = 64 * 1024;

/// One logical file held inside a container
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NamedBlob {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl NamedBlob {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Sequential container reader
///
/// Walks header records until the source runs short of a full block or an
/// all-zero end marker is found. Header checksums are not re-verified;
/// integrity is the outer envelope's job.
pub struct ContainerReader<R: Read> {
    reader: R,
}

impl<R: Read> ContainerReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Read every blob in the container
    pub fn read_all(mut self, token: &CancellationToken) -> Result<Vec<NamedBlob>> {
        let mut blobs = Vec::new();

        loop {
            token.check()?;

            let mut block = [0u8; BLOCK_SIZE];
            let got = read_up_to(&mut self.reader, &mut block, token)?;
            if got < BLOCK_SIZE {
                tracing::trace!(got, "short header block, stopping");
                break;
            }
            if is_zero_block(&block) {
                break;
            }

            let header = EntryHeader::from_bytes(&block);
            let bytes = self.read_data(header.size, token)?;
            let complete = bytes.len() as u64 == header.size;

            if complete {
                self.skip(padding_for(header.size), token)?;
            } else {
                tracing::debug!(
                    name = %header.name,
                    expected = header.size,
                    got = bytes.len(),
                    "container data truncated"
                );
            }

            blobs.push(NamedBlob {
                name: header.name,
                bytes,
            });

            if !complete {
                break;
            }
        }

        Ok(blobs)
    }

    /// Read up to `size` bytes, stopping early if the source is exhausted
    fn read_data(&mut self, size: u64, token: &CancellationToken) -> Result<Vec<u8>> {
        let mut data = Vec::new();
        let mut chunk = vec![0u8; READ_CHUNK];
        let mut remaining = size;

        while remaining > 0 {
            token.check()?;
            let want = remaining.min(READ_CHUNK as u64) as usize;
            let got = read_up_to(&mut self.reader, &mut chunk[..want], token)?;
            data.extend_from_slice(&chunk[..got]);
            remaining -= got as u64;
            if got < want {
                break;
            }
        }

        Ok(data)
    }

    fn skip(&mut self, count: usize, token: &CancellationToken) -> Result<()> {
        let mut sink = [0u8; BLOCK_SIZE];
        read_up_to(&mut self.reader, &mut sink[..count], token)?;
        Ok(())
    }
}

/// Fill `buf` as far as the source allows, returning how much was read
fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8], token: &CancellationToken) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        token.check()?;
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}
