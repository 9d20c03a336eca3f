//! Error types for cache and compile operations.

use std::path::PathBuf;

use yang_config::ConfigError;
use yang_modules::ModuleError;

/// Errors that can occur while resolving inputs, compiling, or persisting.
///
/// Undecodable cache files never surface as errors from
/// [`crate::CacheStore::load`]; the header and checksum variants are used
/// internally and logged before the load reports a miss.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The project configuration or manifest could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A SID file named by the manifest does not exist.
    #[error("SID file '{path}' not found")]
    MissingSidFile {
        /// The expected SID file path.
        path: PathBuf,
    },

    /// The YANG file derived from a SID file name does not exist.
    #[error("YANG file '{path}' not found")]
    MissingSchemaFile {
        /// The expected YANG file path.
        path: PathBuf,
    },

    /// An I/O error occurred on an input or the cache file.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The cache file has an invalid or missing header.
    #[error("invalid cache header in {path}: {reason}")]
    InvalidHeader {
        /// The cache file path.
        path: PathBuf,
        /// Description of the header problem.
        reason: String,
    },

    /// The stored checksum does not match the payload.
    #[error("checksum mismatch in {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// The cache file path.
        path: PathBuf,
        /// Checksum recorded in the header.
        expected: String,
        /// Checksum computed from the payload.
        actual: String,
    },

    /// The cache format version does not match this build.
    #[error("version mismatch in {path}: expected {expected}, got {actual}")]
    VersionMismatch {
        /// The cache file path.
        path: PathBuf,
        /// The format version this build writes.
        expected: u32,
        /// The format version found in the file.
        actual: u32,
    },

    /// A record could not be encoded or decoded.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the failure.
        reason: String,
    },

    /// Compiling the module set failed.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// A module set operation failed outside compilation.
    #[error(transparent)]
    Module(#[from] ModuleError),
}

/// Errors raised by the compilation orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// The compiler process could not be started.
    #[error("failed to run schema compiler on {path}: {source}")]
    Spawn {
        /// The YANG file being compiled.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The compiler exited with a failure status.
    #[error("schema compiler failed on {path}:\n{diagnostic}")]
    Compiler {
        /// The YANG file being compiled.
        path: PathBuf,
        /// The compiler's standard error output.
        diagnostic: String,
    },

    /// Aggregating the compiled modules failed.
    #[error(transparent)]
    Module(#[from] ModuleError),

    /// The worker pool could not be created.
    #[error("failed to start compile workers: {0}")]
    Pool(String),
}
