//! Runtime configuration, read from a TOML file.
//!
//! ```toml
//! store_path = "stegocore-records.toml"
//! log_level = "info"
//!
//! [spectral]
//! base_index = 100
//! delta = 32.0
//! threshold = 16.0
//! window_bits = 1024
//! ```
//!
//! Every key is optional. A missing file yields [`StegoConfig::default`].

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::stego::spectral::SpectralParams;

/// Default metadata store location, relative to the working directory.
pub const DEFAULT_STORE_PATH: &str = "stegocore-records.toml";

/// Default log filter when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Errors that can occur when loading the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("Invalid spectral parameters: {0}")]
    InvalidSpectral(String),
}

/// Crate configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StegoConfig {
    /// Shared embed/extract contract for the audio codec.
    pub spectral: SpectralParams,

    /// Location of the metadata store file.
    pub store_path: PathBuf,

    /// `tracing` filter directive.
    pub log_level: String,
}

impl Default for StegoConfig {
    fn default() -> Self {
        Self {
            spectral: SpectralParams::default(),
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl StegoConfig {
    /// Loads the configuration from `path`, or defaults if the file does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parses and validates a TOML document.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: StegoConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.spectral;
        if !(s.delta.is_finite() && s.delta > 0.0) {
            return Err(ConfigError::InvalidSpectral(format!(
                "delta must be positive, got {}",
                s.delta
            )));
        }
        if !(s.threshold.is_finite() && s.threshold.abs() < s.delta) {
            return Err(ConfigError::InvalidSpectral(format!(
                "threshold {} must lie strictly between -delta and delta",
                s.threshold
            )));
        }
        if s.window_bits < 8 {
            return Err(ConfigError::InvalidSpectral(
                "window must hold at least the 8-bit marker".to_string(),
            ));
        }
        Ok(())
    }
}
