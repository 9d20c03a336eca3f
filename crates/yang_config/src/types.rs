//! Configuration types deserialized from `yang-schema.toml`.

use serde::Deserialize;

/// Default location of the SID manifest, relative to the project root.
pub const DEFAULT_MANIFEST: &str = "support/scripts/gen-cc-nodes.yaml";

/// Default directory holding `.yang` and `.sid` files, relative to the project root.
pub const DEFAULT_YANG_DIR: &str = "docs/sw_refs/yang";

/// Default cache file, relative to the project root.
pub const DEFAULT_CACHE_FILE: &str = ".yang-schema-cache";

/// Default schema compiler executable.
pub const DEFAULT_COMPILER: &str = "pyang";

/// The top-level project configuration.
///
/// Every section is optional; a missing `yang-schema.toml` is equivalent to
/// an empty one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectConfig {
    /// Input and cache locations.
    #[serde(default)]
    pub paths: PathsConfig,
    /// External schema compiler settings.
    #[serde(default)]
    pub compiler: CompilerConfig,
}

/// Locations of the project inputs and the cache file, relative to the root.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// The YAML manifest listing the project's SID files.
    pub manifest: String,
    /// Directory containing both the `.yang` and `.sid` files.
    pub yang_dir: String,
    /// The persisted cache record.
    pub cache_file: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            manifest: DEFAULT_MANIFEST.to_string(),
            yang_dir: DEFAULT_YANG_DIR.to_string(),
            cache_file: DEFAULT_CACHE_FILE.to_string(),
        }
    }
}

/// Settings for invoking the external schema compiler.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Executable name or path.
    pub program: String,
    /// Upper bound on concurrent compiler processes. `0` runs one per file.
    pub max_jobs: usize,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_COMPILER.to_string(),
            max_jobs: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let config = ProjectConfig::default();
        assert_eq!(config.paths.manifest, DEFAULT_MANIFEST);
        assert_eq!(config.paths.yang_dir, DEFAULT_YANG_DIR);
        assert_eq!(config.paths.cache_file, DEFAULT_CACHE_FILE);
        assert_eq!(config.compiler.program, DEFAULT_COMPILER);
        assert_eq!(config.compiler.max_jobs, 0);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config: ProjectConfig = toml::from_str(
            r#"
[paths]
cache_file = "build/yang.cache"
"#,
        )
        .unwrap();
        assert_eq!(config.paths.cache_file, "build/yang.cache");
        assert_eq!(config.paths.manifest, DEFAULT_MANIFEST);
        assert_eq!(config.compiler.program, DEFAULT_COMPILER);
    }
}
