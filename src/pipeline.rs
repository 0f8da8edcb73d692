//! Pipeline orchestrator
//!
//! Create:  input -> container -> gzip -> hex -> envelope
//! Verify:  envelope -> digest check
//! Extract: envelope -> hex -> gunzip -> container -> blobs
//!
//! Every operation is stateless and reports through [`OpResult`]; the only
//! outcome that is not an `OpResult` is cancellation.

use crate::archive::{ContainerReader, ContainerWriter, NamedBlob};
use crate::cancel::CancellationToken;
use crate::compression;
use crate::config::LoafConfig;
use crate::envelope;
use crate::error::{LoafError, Result};
use crate::input::{self, InputSource};
use crate::transcode;
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;

/// Success flag plus payload
///
/// When `succeeded` is false the payload is its type's default and carries
/// no meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpResult<T> {
    pub succeeded: bool,
    pub payload: T,
}

impl<T> OpResult<T> {
    pub fn ok(payload: T) -> Self {
        Self {
            succeeded: true,
            payload,
        }
    }
}

impl<T: Default> OpResult<T> {
    pub fn failed() -> Self {
        Self {
            succeeded: false,
            payload: T::default(),
        }
    }
}

/// The operation observed its cancellation token and stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operation cancelled")]
pub struct Cancelled;

/// Outcome of a pipeline operation
pub type Outcome<T> = std::result::Result<OpResult<T>, Cancelled>;

/// Create/Verify/Extract front door
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: LoafConfig,
}

impl Pipeline {
    pub fn new(config: LoafConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &LoafConfig {
        &self.config
    }

    /// Package `input` into an envelope line
    pub fn create(&self, input: InputSource, token: &CancellationToken) -> Outcome<String> {
        guarded("create", || self.try_create(input, token))
    }

    /// Check the envelope's embedded digest
    ///
    /// - unparsable text: `succeeded == false`
    /// - digest not 64 characters: `succeeded == true`, `payload == false`
    /// - otherwise: `succeeded == true`, `payload` = digest matches
    pub fn verify(&self, envelope_text: &str, token: &CancellationToken) -> Outcome<bool> {
        guarded("verify", || {
            token.check()?;
            let parsed = envelope::parse(envelope_text.trim())?;
            if !parsed.has_full_digest() {
                tracing::debug!(len = parsed.hash.len(), "envelope digest has wrong length");
                return Ok(false);
            }
            token.check()?;
            Ok(envelope::verify(parsed.hash, parsed.payload))
        })
    }

    /// Unpack the blobs held in an envelope
    ///
    /// The embedded digest is not checked; call [`Pipeline::verify`] for that.
    pub fn extract(&self, envelope_text: &str, token: &CancellationToken) -> Outcome<Vec<NamedBlob>> {
        guarded("extract", || {
            token.check()?;
            let parsed = envelope::parse(envelope_text.trim())?;
            let compressed = transcode::decode(parsed.payload)?;
            token.check()?;
            let container = compression::decompress(&compressed, token)?;
            ContainerReader::new(&container[..]).read_all(token)
        })
    }

    fn try_create(&self, input: InputSource, token: &CancellationToken) -> Result<String> {
        token.check()?;
        let (name, mut reader) = input.open(&self.config.default_name)?;
        let data = input::read_to_end(&mut reader, token)?;

        let mut writer = ContainerWriter::new().with_mode(self.config.file_mode);
        if let Some(secs) = self.config.modification_time {
            writer = writer.with_modified_time(secs);
        }
        let container = writer.write(&name, &data, token)?;

        let compressed = compression::compress(&container, self.config.compression_level, token)?;
        token.check()?;
        let hex_payload = transcode::encode(&compressed);
        token.check()?;

        tracing::debug!(
            name = %name,
            input = data.len(),
            container = container.len(),
            compressed = compressed.len(),
            "envelope created"
        );
        Ok(envelope::format(&hex_payload))
    }
}

/// Run one operation, folding errors and panics into an [`Outcome`]
fn guarded<T, F>(operation: &'static str, f: F) -> Outcome<T>
where
    T: Default,
    F: FnOnce() -> Result<T>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(payload)) => Ok(OpResult::ok(payload)),
        Ok(Err(LoafError::Cancelled)) => {
            tracing::debug!(operation, "cancelled");
            Err(Cancelled)
        }
        Ok(Err(error)) => {
            tracing::warn!(operation, error = %error, "operation failed");
            Ok(OpResult::failed())
        }
        Err(_) => {
            tracing::error!(operation, "operation panicked");
            Ok(OpResult::failed())
        }
    }
}
