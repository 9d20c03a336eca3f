//! The YANG module collection.
//!
//! A [`ModuleSet`] accumulates compiled modules (YIN text emitted by the
//! schema compiler), links them into a finalized [`SchemaData`], and folds in
//! SID assignments. The whole set is serializable so it can be persisted and
//! restored without recompiling.

#![warn(missing_docs)]

pub mod error;
pub mod module_set;
pub mod schema;
pub mod sid;
pub mod yin;

pub use error::ModuleError;
pub use module_set::ModuleSet;
pub use schema::{ModuleInfo, SchemaData, SidIndex};
pub use sid::{read_sid_file, SidFile, SidItem, SidNamespace};
pub use yin::{scan_header, ModuleKind, YinHeader};
