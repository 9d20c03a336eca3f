//! Error types for configuration and manifest loading.

use std::path::PathBuf;

/// Errors that can occur when loading `yang-schema.toml` or the SID manifest.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading a configuration file.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(String),

    /// The SID manifest could not be parsed.
    #[error("failed to parse manifest {path}: {reason}")]
    Manifest {
        /// The manifest file path.
        path: PathBuf,
        /// Description of the parse failure.
        reason: String,
    },

    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    Validation(String),
}
