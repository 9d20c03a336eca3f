//! `yang-schema build` — bring the schema cache up to date.

use yang_cache::{CacheOutcome, PersistentSchema};

use crate::pipeline::load_project;
use crate::GlobalArgs;

/// Runs the `build` command. Returns exit code 0 on success.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (layout, compiler) = load_project(global)?;
    let schema = PersistentSchema::open(&layout, &compiler)?;
    let data = schema.schema_data()?;

    if !global.quiet {
        let how = match schema.outcome() {
            CacheOutcome::Hit => "cached",
            CacheOutcome::Absent => "compiled",
            CacheOutcome::Stale => "recompiled",
        };
        eprintln!(
            "    Schema {how}: {} modules, {} SIDs ({})",
            data.modules.len(),
            data.sids.len(),
            layout.cache_file.display()
        );
    }
    Ok(0)
}
