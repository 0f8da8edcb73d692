use crate::error::{LoafError, Result};

/// Container block size in bytes; headers, padded data and end markers are
/// all multiples of this
pub const BLOCK_SIZE: usize = 512;

/// Number of all-zero blocks terminating the container
pub const END_MARKER_BLOCKS: usize = 2;

/// Maximum name length in bytes (UTF-8); longer names are truncated
pub const MAX_NAME_LENGTH: usize = 100;

/// Type flag for a regular file
pub const REGULAR_FILE: u8 = b'0';

/// Largest size representable in the 11-digit octal size field
pub const MAX_ENTRY_SIZE: u64 = 0o77_777_777_777;

/// Largest Unix time representable in the 11-digit octal mtime field
pub const MAX_MODIFIED_TIME: u64 = 0o77_777_777_777;

// Field offsets and widths within the 512-byte header
const NAME: (usize, usize) = (0, 100);
const MODE: (usize, usize) = (100, 8);
const UID: (usize, usize) = (108, 8);
const GID: (usize, usize) = (116, 8);
const SIZE: (usize, usize) = (124, 12);
const MTIME: (usize, usize) = (136, 12);
const CHECKSUM: (usize, usize) = (148, 8);
const TYPE_FLAG: usize = 156;

/// Fixed-layout 512-byte header preceding each blob in the container
///
/// Structure:
/// - Name: 100 bytes (NUL-padded UTF-8)
/// - Mode: 8 bytes (7 octal digits + NUL)
/// - Owner id: 8 bytes (7 octal digits + NUL)
/// - Group id: 8 bytes (7 octal digits + NUL)
/// - Size: 12 bytes (11 octal digits + NUL)
/// - Modified time: 12 bytes (11 octal digits + NUL, Unix seconds)
/// - Checksum: 8 bytes (6 octal digits + NUL + SPACE)
/// - Type flag: 1 byte (`'0'` = regular file)
/// - Remainder: zero
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryHeader {
    pub name: String,
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
    pub size: u64,
    pub modified_time: u64,
    pub type_flag: u8,
    /// Checksum as stored on disk; recomputed by [`EntryHeader::to_bytes`]
    pub checksum: u32,
}

impl EntryHeader {
    /// Create a regular-file header for `name` holding `size` bytes
    pub fn new(name: impl Into<String>, size: u64, modified_time: u64, mode: u32) -> Self {
        Self {
            name: name.into(),
            mode,
            uid: 0,
            gid: 0,
            size,
            modified_time,
            type_flag: REGULAR_FILE,
            checksum: 0,
        }
    }

    /// Serialize into a 512-byte block, computing the checksum
    ///
    /// Names longer than [`MAX_NAME_LENGTH`] bytes are truncated.
    pub fn to_bytes(&self) -> Result<[u8; BLOCK_SIZE]> {
        if self.size > MAX_ENTRY_SIZE {
            return Err(LoafError::EntryTooLarge(self.size));
        }
        if self.modified_time > MAX_MODIFIED_TIME {
            return Err(LoafError::TimestampOutOfRange(self.modified_time));
        }

        let mut block = [0u8; BLOCK_SIZE];

        let name_bytes = self.name.as_bytes();
        let name_len = name_bytes.len().min(MAX_NAME_LENGTH);
        if name_len < name_bytes.len() {
            tracing::warn!(
                name = %self.name,
                len = name_bytes.len(),
                "entry name truncated to {} bytes",
                MAX_NAME_LENGTH
            );
        }
        block[NAME.0..NAME.0 + name_len].copy_from_slice(&name_bytes[..name_len]);

        put_octal(&mut block, MODE, u64::from(self.mode));
        put_octal(&mut block, UID, u64::from(self.uid));
        put_octal(&mut block, GID, u64::from(self.gid));
        put_octal(&mut block, SIZE, self.size);
        put_octal(&mut block, MTIME, self.modified_time);
        block[TYPE_FLAG] = self.type_flag;

        let checksum = header_checksum(&block);
        let field = format!("{:06o}\0 ", checksum);
        block[CHECKSUM.0..CHECKSUM.0 + CHECKSUM.1].copy_from_slice(field.as_bytes());

        Ok(block)
    }

    /// Parse a 512-byte block
    ///
    /// Parsing is lenient: numeric fields that fail to parse read as zero and
    /// the name is decoded lossily. The checksum is not validated here; see
    /// [`EntryHeader::verify_checksum`].
    pub fn from_bytes(block: &[u8; BLOCK_SIZE]) -> Self {
        let name_field = &block[NAME.0..NAME.0 + NAME.1];
        let name_end = name_field
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(name_field.len());
        let name = String::from_utf8_lossy(&name_field[..name_end]).into_owned();

        Self {
            name,
            mode: parse_numeric(field(block, MODE)) as u32,
            uid: parse_numeric(field(block, UID)) as u32,
            gid: parse_numeric(field(block, GID)) as u32,
            size: parse_numeric(field(block, SIZE)),
            modified_time: parse_numeric(field(block, MTIME)),
            type_flag: block[TYPE_FLAG],
            checksum: parse_numeric(field(block, CHECKSUM)) as u32,
        }
    }

    /// Recompute the checksum of `block` and compare it with the stored field
    pub fn verify_checksum(block: &[u8; BLOCK_SIZE]) -> bool {
        let stored = parse_numeric(field(block, CHECKSUM)) as u32;
        stored == header_checksum(block)
    }
}

/// Sum of all header bytes with the checksum field counted as eight spaces
pub fn header_checksum(block: &[u8; BLOCK_SIZE]) -> u32 {
    block
        .iter()
        .enumerate()
        .map(|(i, &b)| {
            if (CHECKSUM.0..CHECKSUM.0 + CHECKSUM.1).contains(&i) {
                u32::from(b' ')
            } else {
                u32::from(b)
            }
        })
        .sum()
}

/// True for an end-of-container marker block
pub fn is_zero_block(block: &[u8]) -> bool {
    block.iter().all(|&b| b == 0)
}

/// Number of zero bytes needed to pad `len` to the next block boundary
pub fn padding_for(len: u64) -> usize {
    let rem = (len % BLOCK_SIZE as u64) as usize;
    if rem == 0 {
        0
    } else {
        BLOCK_SIZE - rem
    }
}

fn field(block: &[u8; BLOCK_SIZE], (offset, width): (usize, usize)) -> &[u8] {
    &block[offset..offset + width]
}

/// Write `value` as zero-padded octal filling the field minus its NUL terminator
fn put_octal(block: &mut [u8; BLOCK_SIZE], (offset, width): (usize, usize), value: u64) {
    let digits = format!("{:0w$o}", value, w = width - 1);
    let digits = &digits.as_bytes()[digits.len() - (width - 1)..];
    block[offset..offset + width - 1].copy_from_slice(digits);
    block[offset + width - 1] = 0;
}

/// Parse a numeric field: octal first, then plain decimal, else zero
fn parse_numeric(raw: &[u8]) -> u64 {
    let text = String::from_utf8_lossy(raw);
    let trimmed = text.trim_matches(|c| c == '\0' || c == ' ');

    u64::from_str_radix(trimmed, 8)
        .or_else(|_| trimmed.parse::<u64>())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let header = EntryHeader::new("hello.txt", 13, 1_700_000_000, 0o644);
        let block = header.to_bytes().unwrap();

        assert_eq!(&block[0..9], b"hello.txt");
        assert!(block[9..100].iter().all(|&b| b == 0));
        assert_eq!(&block[100..108], b"0000644\0");
        assert_eq!(&block[108..116], b"0000000\0");
        assert_eq!(&block[116..124], b"0000000\0");
        assert_eq!(&block[124..136], b"00000000015\0");
        assert_eq!(&block[136..148], b"14524770400\0");
        assert_eq!(block[156], b'0');
        assert_eq!(block[154], 0);
        assert_eq!(block[155], b' ');
        assert!(block[157..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_checksum_treats_field_as_spaces() {
        let header = EntryHeader::new("a", 0, 0, 0o644);
        let block = header.to_bytes().unwrap();

        let mut blanked = block;
        blanked[148..156].copy_from_slice(b"        ");
        let expected: u32 = blanked.iter().map(|&b| u32::from(b)).sum();

        assert_eq!(header_checksum(&block), expected);
        let stored = std::str::from_utf8(&block[148..154]).unwrap();
        assert_eq!(u32::from_str_radix(stored, 8).unwrap(), expected);
        assert!(EntryHeader::verify_checksum(&block));
    }

    #[test]
    fn test_verify_checksum_detects_change() {
        let mut block = EntryHeader::new("a", 10, 0, 0o644).to_bytes().unwrap();
        block[0] = b'b';
        assert!(!EntryHeader::verify_checksum(&block));
    }

    #[test]
    fn test_parse_roundtrip_fields() {
        let header = EntryHeader::new("dir/data.bin", 4096, 1_234_567, 0o600);
        let parsed = EntryHeader::from_bytes(&header.to_bytes().unwrap());

        assert_eq!(parsed.name, "dir/data.bin");
        assert_eq!(parsed.size, 4096);
        assert_eq!(parsed.modified_time, 1_234_567);
        assert_eq!(parsed.mode, 0o600);
        assert_eq!(parsed.type_flag, REGULAR_FILE);
    }

    #[test]
    fn test_long_name_truncated() {
        let name = "x".repeat(150);
        let block = EntryHeader::new(name, 0, 0, 0o644).to_bytes().unwrap();
        let parsed = EntryHeader::from_bytes(&block);
        assert_eq!(parsed.name.len(), MAX_NAME_LENGTH);
    }

    #[test]
    fn test_size_too_large() {
        let header = EntryHeader::new("big", MAX_ENTRY_SIZE + 1, 0, 0o644);
        assert!(matches!(header.to_bytes(), Err(LoafError::EntryTooLarge(_))));
    }

    #[test]
    fn test_mtime_too_large() {
        let header = EntryHeader::new("late", 0, MAX_MODIFIED_TIME + 0o20, 0o644);
        assert!(matches!(
            header.to_bytes(),
            Err(LoafError::TimestampOutOfRange(t)) if t == MAX_MODIFIED_TIME + 0o20
        ));

        let block = EntryHeader::new("edge", 0, MAX_MODIFIED_TIME, 0o644).to_bytes().unwrap();
        assert_eq!(EntryHeader::from_bytes(&block).modified_time, MAX_MODIFIED_TIME);
    }

    #[test]
    fn test_name_exactly_max_length() {
        // No NUL terminator fits; the name runs into the mode field boundary
        let name = "y".repeat(MAX_NAME_LENGTH);
        let block = EntryHeader::new(name.clone(), 3, 0, 0o644).to_bytes().unwrap();
        assert!(block[..MAX_NAME_LENGTH].iter().all(|&b| b == b'y'));

        let parsed = EntryHeader::from_bytes(&block);
        assert_eq!(parsed.name, name);
        assert_eq!(parsed.mode, 0o644);
        assert_eq!(parsed.size, 3);
    }

    #[test]
    fn test_name_truncated_inside_utf8_char() {
        // 99 ASCII bytes then a 3-byte char: the cut lands after its first byte
        let name = format!("{}\u{65e5}", "z".repeat(99));
        assert_eq!(name.len(), 102);

        let block = EntryHeader::new(name, 0, 0, 0o644).to_bytes().unwrap();
        assert_eq!(block[99], 0xE6);

        let parsed = EntryHeader::from_bytes(&block);
        assert_eq!(parsed.name, format!("{}\u{FFFD}", "z".repeat(99)));
    }

    #[test]
    fn test_parse_numeric_fallbacks() {
        assert_eq!(parse_numeric(b"00000000015\0"), 13);
        assert_eq!(parse_numeric(b"  17 \0"), 15);
        // Not octal, still decimal
        assert_eq!(parse_numeric(b"0000000019\0\0"), 19);
        assert_eq!(parse_numeric(b"garbage\0"), 0);
        assert_eq!(parse_numeric(b"\0\0\0\0"), 0);
    }

    #[test]
    fn test_padding() {
        assert_eq!(padding_for(0), 0);
        assert_eq!(padding_for(1), 511);
        assert_eq!(padding_for(512), 0);
        assert_eq!(padding_for(513), 511);
    }
}
