//! Pipeline configuration

use crate::archive::{DEFAULT_FILE_MODE, MAX_MODIFIED_TIME};
use crate::compression::BEST_LEVEL;
use crate::error::{LoafError, Result};
use serde::{Deserialize, Serialize};

/// Name given to blobs created from raw text input
pub const DEFAULT_BLOB_NAME: &str = "-";

/// Settings applied by [`crate::Pipeline`] when creating envelopes
///
/// Missing keys fall back to the defaults, so a partial TOML document is fine:
///
/// ```
/// use loaf_rs::LoafConfig;
///
/// let config = LoafConfig::from_toml_str("compression_level = 6").unwrap();
/// assert_eq!(config.compression_level, 6);
/// assert_eq!(config.default_name, "-");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoafConfig {
    /// Deflate level, 0 (store) to 9 (best)
    pub compression_level: u32,

    /// Blob name used when the input has no natural name
    pub default_name: String,

    /// Fixed header modification time (Unix seconds); `None` uses the clock
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modification_time: Option<u64>,

    /// Header file mode
    pub file_mode: u32,
}

impl Default for LoafConfig {
    fn default() -> Self {
        Self {
            compression_level: BEST_LEVEL,
            default_name: DEFAULT_BLOB_NAME.to_string(),
            modification_time: None,
            file_mode: DEFAULT_FILE_MODE,
        }
    }
}

impl LoafConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Pin the header modification time, making output deterministic
    pub fn with_modification_time(mut self, secs: u64) -> Self {
        self.modification_time = Some(secs);
        self
    }

    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.compression_level > BEST_LEVEL {
            return Err(LoafError::Config(format!(
                "compression_level must be 0-{}, got {}",
                BEST_LEVEL, self.compression_level
            )));
        }
        if self.default_name.is_empty() {
            return Err(LoafError::Config("default_name must not be empty".to_string()));
        }
        if let Some(secs) = self.modification_time {
            if secs > MAX_MODIFIED_TIME {
                return Err(LoafError::Config(format!(
                    "modification_time {} exceeds 11 octal digits (max {})",
                    secs, MAX_MODIFIED_TIME
                )));
            }
        }
        if self.file_mode > 0o7777 {
            return Err(LoafError::Config(format!(
                "file_mode {:o} is not a permission mode",
                self.file_mode
            )));
        }
        Ok(())
    }
}
