//! Project root discovery and path resolution.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::loader::load_config;
use crate::types::{CompilerConfig, ProjectConfig};

/// Name of the project configuration file that marks a project root.
pub const CONFIG_FILE: &str = "yang-schema.toml";

/// Absolute locations of every project input, resolved against the root.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    /// The project root directory.
    pub root: PathBuf,
    /// The SID manifest file.
    pub manifest: PathBuf,
    /// Directory containing the `.yang` and `.sid` files; also the compiler search path.
    pub yang_dir: PathBuf,
    /// The persisted cache record.
    pub cache_file: PathBuf,
    /// External compiler settings.
    pub compiler: CompilerConfig,
}

impl ProjectLayout {
    /// Resolves the configured relative paths against `root`.
    pub fn from_config(root: &Path, config: &ProjectConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            manifest: root.join(&config.paths.manifest),
            yang_dir: root.join(&config.paths.yang_dir),
            cache_file: root.join(&config.paths.cache_file),
            compiler: config.compiler.clone(),
        }
    }

    /// Loads `yang-schema.toml` from `root` (defaults if absent) and resolves it.
    ///
    /// A relative `root` is made absolute against the current directory, so
    /// every resolved path is absolute.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let root = std::path::absolute(root).map_err(|e| ConfigError::Io {
            path: root.to_path_buf(),
            source: e,
        })?;
        let config = load_config(&root)?;
        Ok(Self::from_config(&root, &config))
    }
}

/// Walks up from `start` looking for the nearest directory containing
/// `yang-schema.toml`.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE).is_file() {
            return Some(current);
        }
        if !current.pop() {
            return None;
        }
    }
}
