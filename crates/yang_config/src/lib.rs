//! Project configuration for YANG schema materialization.
//!
//! Reads the optional `yang-schema.toml` project file, resolves the project
//! layout (manifest, YANG directory, cache file) against the project root,
//! and parses the SID-file manifest that lists the project's inputs.

#![warn(missing_docs)]

pub mod error;
pub mod layout;
pub mod loader;
pub mod manifest;
pub mod types;

pub use error::ConfigError;
pub use layout::{find_project_root, ProjectLayout, CONFIG_FILE};
pub use loader::{load_config, load_config_from_str};
pub use manifest::{load_manifest, load_manifest_from_str, SidManifest};
pub use types::*;
