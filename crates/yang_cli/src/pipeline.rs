//! Shared helpers for CLI commands: project root and layout resolution.

use std::path::PathBuf;

use yang_cache::PyangCompiler;
use yang_config::{find_project_root, ProjectLayout};

use crate::GlobalArgs;

/// Resolves the project root from global CLI args.
///
/// `--root` wins. Otherwise walks up from the current directory looking for
/// `yang-schema.toml`, falling back to the current directory itself.
pub fn resolve_project_root(global: &GlobalArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(ref root) = global.root {
        let root = PathBuf::from(root);
        if !root.is_dir() {
            return Err(format!("project root {} is not a directory", root.display()).into());
        }
        return Ok(root);
    }
    let cwd = std::env::current_dir()?;
    Ok(find_project_root(&cwd).unwrap_or(cwd))
}

/// Loads the project layout and the configured compiler.
pub fn load_project(
    global: &GlobalArgs,
) -> Result<(ProjectLayout, PyangCompiler), Box<dyn std::error::Error>> {
    let root = resolve_project_root(global)?;
    let layout = ProjectLayout::load(&root)?;
    let compiler = PyangCompiler::from_config(&layout.compiler);
    Ok((layout, compiler))
}
