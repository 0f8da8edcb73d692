//! Hex transcoder: lowercase, no separators, no line breaks

use crate::error::{LoafError, Result};

/// Encode bytes as two lowercase hex digits each
pub fn encode(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decode a hex payload
///
/// Odd length is rejected before any digit is looked at.
pub fn decode(text: &str) -> Result<Vec<u8>> {
    if text.len() % 2 != 0 {
        return Err(LoafError::OddHexLength(text.len()));
    }
    Ok(hex::decode(text)?)
}
