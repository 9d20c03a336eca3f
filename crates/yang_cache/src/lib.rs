//! Persistent cache for compiled YANG module sets.
//!
//! Resolves a project's SID manifest into its YANG and SID inputs, decides
//! from their modification times whether the persisted module set is still
//! valid, and otherwise recompiles every YANG file in parallel with the
//! external schema compiler before persisting the new result under a file
//! lock.

#![warn(missing_docs)]

pub mod compile;
pub mod error;
pub mod fingerprint;
pub mod inputs;
pub mod persistent;
pub mod store;

pub use compile::{compile_modules, CompilerOutput, PyangCompiler, SchemaCompiler};
pub use error::{CacheError, CompileError};
pub use fingerprint::{FileStamp, FingerprintDiff, InputFingerprint};
pub use inputs::{resolve_inputs, resolve_project, schema_file_name, ResolvedInputs};
pub use persistent::{
    check_status, generate_schema, modules_get, schema_get, CacheOutcome, CacheStatus,
    PersistentSchema,
};
pub use store::{CacheRecord, CacheStore};
