mod format;
mod reader;
mod writer;

pub use format::{
    header_checksum, is_zero_block, padding_for, EntryHeader, BLOCK_SIZE, END_MARKER_BLOCKS,
    MAX_ENTRY_SIZE, MAX_MODIFIED_TIME, MAX_NAME_LENGTH, REGULAR_FILE,
};
pub use reader::{ContainerReader, NamedBlob};
pub use writer::{ContainerWriter, DEFAULT_FILE_MODE};
