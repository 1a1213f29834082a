//! # Config Error Types
//!
//! Only I/O and document errors surface. Bad mutation input is reported
//! through [`crate::SetOutcome`] instead.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur loading or saving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Reading or writing the backing file failed.
    #[error("config file {}: {source}", .path.display())]
    Io {
        /// The file involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The backing file is not a valid config document.
    #[error("malformed config document: {0}")]
    Parse(#[from] toml::de::Error),

    /// The table could not be rendered as TOML.
    #[error("config table could not be serialized: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Persisting was requested on a store with no backing file.
    #[error("config store has no backing file")]
    NotPersistent,
}

/// Result type for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
