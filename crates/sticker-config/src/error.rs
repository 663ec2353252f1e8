//! # Config Error Types
//!
//! Failures while loading settings or building the catalog.
//!
//! ```text
//! ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────────┐
//! │   File system   │  │     Format      │  │         Content             │
//! │                 │  │                 │  │                             │
//! │  Io             │  │  Parse          │  │  Invalid (settings rules)   │
//! │                 │  │  Serialize      │  │  Core (tier / scaling data) │
//! └─────────────────┘  └─────────────────┘  └─────────────────────────────┘
//! ```

use sticker_core::{CoreError, ValidationError};
use thiserror::Error;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Settings file could not be read or written.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file is not valid TOML or does not match the schema.
    ///
    /// Malformed tier tables land here too, since [`sticker_core::TierTable`]
    /// validates during deserialization.
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Settings parsed but break a rule (duplicate variant, bad MOQ, ...).
    #[error("Invalid settings: {0}")]
    Invalid(String),

    /// Pricing data rejected by the core.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<ValidationError> for ConfigError {
    fn from(err: ValidationError) -> Self {
        ConfigError::Core(err.into())
    }
}
