//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::layout::CONFIG_FILE;
use crate::types::ProjectConfig;
use std::path::Path;

/// Loads and validates `yang-schema.toml` from a project directory.
///
/// A missing file yields the default configuration; any other read error
/// is reported.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE);
    let content = match std::fs::read_to_string(&config_path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(ProjectConfig::default()),
        Err(e) => {
            return Err(ConfigError::Io {
                path: config_path,
                source: e,
            })
        }
    };
    load_config_from_str(&content)
}

/// Parses and validates a `yang-schema.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    let paths = [
        ("paths.manifest", &config.paths.manifest),
        ("paths.yang_dir", &config.paths.yang_dir),
        ("paths.cache_file", &config.paths.cache_file),
        ("compiler.program", &config.compiler.program),
    ];
    for (field, value) in paths {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(format!("{field} must not be empty")));
        }
    }
    Ok(())
}
