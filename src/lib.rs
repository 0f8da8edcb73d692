//! Loaf-rs: self-validating single-line archive codec
//!
//! A loaf envelope packages one named blob into a single transmission-safe
//! line of text:
//! - the blob is written into a tar-style container (512-byte header, padding,
//!   two zero end blocks)
//! - the container is gzip-compressed
//! - the compressed bytes are hex-encoded
//! - the hex text is prefixed with its own SHA-256 digest:
//!   `SHA256(-)=<digest> <hex>`
//!
//! # Example
//!
//! ```
//! use loaf_rs::{CancellationToken, InputSource, Pipeline};
//!
//! let pipeline = Pipeline::default();
//! let token = CancellationToken::none();
//!
//! let created = pipeline.create(InputSource::text("Hello, World!"), &token).unwrap();
//! assert!(created.succeeded);
//!
//! let verified = pipeline.verify(&created.payload, &token).unwrap();
//! assert!(verified.succeeded && verified.payload);
//!
//! let blobs = pipeline.extract(&created.payload, &token).unwrap().payload;
//! assert_eq!(blobs[0].name, "-");
//! assert_eq!(blobs[0].bytes, b"Hello, World!");
//! ```

// Core modules
pub mod archive;
pub mod cancel;
pub mod compression;
pub mod config;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod input;
pub mod pipeline;
pub mod transcode;

// Re-export commonly used types
pub use archive::{
    ContainerReader, ContainerWriter, EntryHeader, NamedBlob, BLOCK_SIZE, MAX_NAME_LENGTH,
};
pub use cancel::CancellationToken;
pub use config::{LoafConfig, DEFAULT_BLOB_NAME};
pub use dispatch::{Dispatcher, Published, Request, Response};
pub use envelope::{is_envelope, ENVELOPE_PREFIX};
pub use error::{LoafError, Result};
pub use input::InputSource;
pub use pipeline::{Cancelled, OpResult, Outcome, Pipeline};
