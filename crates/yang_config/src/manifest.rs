//! The SID manifest: the YAML file naming the SID files a project uses.
//!
//! Only the `sid-files` list is read; any other keys in the document belong
//! to other tools and are ignored.

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// The list of SID file names a project is built from, in manifest order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SidManifest {
    /// SID file names (`<module>@<revision>.sid`), relative to the YANG directory.
    #[serde(rename = "sid-files")]
    pub sid_files: Vec<String>,
}

/// Reads and parses the manifest at `path`.
pub fn load_manifest(path: &Path) -> Result<SidManifest, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    load_manifest_from_str(&content).map_err(|e| match e {
        ConfigError::Manifest { reason, .. } => ConfigError::Manifest {
            path: path.to_path_buf(),
            reason,
        },
        other => other,
    })
}

/// Parses a manifest from a string. Errors carry an empty path.
pub fn load_manifest_from_str(content: &str) -> Result<SidManifest, ConfigError> {
    let manifest: SidManifest =
        serde_yaml::from_str(content).map_err(|e| ConfigError::Manifest {
            path: Default::default(),
            reason: e.to_string(),
        })?;
    if let Some(bad) = manifest.sid_files.iter().find(|s| s.trim().is_empty()) {
        return Err(ConfigError::Manifest {
            path: Default::default(),
            reason: format!("empty entry in sid-files: {bad:?}"),
        });
    }
    Ok(manifest)
}
