//! Checksum envelope
//!
//! An envelope is one line of text:
//!
//! ```text
//! SHA256(-)=<64 lowercase hex digest> <even-length lowercase hex payload>
//! ```
//!
//! The digest covers the UTF-8 bytes of the hex payload text, not the binary
//! it decodes to. Existing envelopes depend on this, so it must not change.

use crate::error::{LoafError, Result};
use regex::Regex;
use sha2::{Digest, Sha256};
use std::sync::OnceLock;

/// Literal prefix every envelope starts with
pub const ENVELOPE_PREFIX: &str = "SHA256(-)=";

/// Length of a rendered SHA-256 digest in hex characters
pub const DIGEST_HEX_LEN: usize = 64;

fn parse_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^SHA256\(-\)=([0-9a-f]+) (.*)$").expect("envelope pattern is valid")
    })
}

fn detect_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^SHA256\(-\)=[0-9a-f]{64} [0-9a-f]*$").expect("detect pattern is valid")
    })
}

/// Envelope split into its digest and payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedEnvelope<'a> {
    pub hash: &'a str,
    pub payload: &'a str,
}

impl ParsedEnvelope<'_> {
    /// Whether the digest has the length of a SHA-256 rendering
    pub fn has_full_digest(&self) -> bool {
        self.hash.len() == DIGEST_HEX_LEN
    }
}

/// Lowercase hex SHA-256 of the payload text
pub fn digest(hex_payload: &str) -> String {
    hex::encode(Sha256::digest(hex_payload.as_bytes()))
}

/// Wrap a hex payload in an envelope line
pub fn format(hex_payload: &str) -> String {
    format!("{}{} {}", ENVELOPE_PREFIX, digest(hex_payload), hex_payload)
}

/// Split an envelope into digest and payload
///
/// The digest group only has to be non-empty lowercase hex here; a wrong
/// length is left for the caller to judge.
pub fn parse(envelope: &str) -> Result<ParsedEnvelope<'_>> {
    let caps = parse_pattern()
        .captures(envelope)
        .ok_or_else(|| LoafError::InvalidEnvelope("does not match SHA256(-)=<hash> <hex>".to_string()))?;

    match (caps.get(1), caps.get(2)) {
        (Some(hash), Some(payload)) => Ok(ParsedEnvelope {
            hash: hash.as_str(),
            payload: payload.as_str(),
        }),
        _ => Err(LoafError::InvalidEnvelope("missing hash or payload".to_string())),
    }
}

/// Recompute the payload digest and compare it, ignoring case
pub fn verify(hash: &str, hex_payload: &str) -> bool {
    digest(hex_payload).eq_ignore_ascii_case(hash)
}

/// Cheap textual check for auto-detection of envelope input
pub fn is_envelope(candidate: &str) -> bool {
    detect_pattern().is_match(candidate.trim())
}
