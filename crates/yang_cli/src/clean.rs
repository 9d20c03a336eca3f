//! `yang-schema clean` — delete the cache file.

use yang_cache::CacheStore;

use crate::pipeline::load_project;
use crate::GlobalArgs;

/// Runs the `clean` command.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (layout, _) = load_project(global)?;
    let removed = CacheStore::new(&layout.cache_file).remove()?;
    if !global.quiet {
        if removed {
            eprintln!("   Removed {}", layout.cache_file.display());
        } else {
            eprintln!("   Nothing to clean");
        }
    }
    Ok(0)
}
