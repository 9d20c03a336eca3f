//! `yang-schema status` — compare inputs against the cache without compiling.

use yang_cache::{check_status, CacheStatus};

use crate::pipeline::load_project;
use crate::GlobalArgs;

/// Runs the `status` command and prints `fresh`, `stale`, or `absent`.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (layout, _) = load_project(global)?;
    match check_status(&layout)? {
        CacheStatus::Fresh => println!("fresh"),
        CacheStatus::Absent => println!("absent"),
        CacheStatus::Stale(diff) => {
            println!("stale");
            if !global.quiet {
                for path in &diff.added {
                    eprintln!("  added    {}", path.display());
                }
                for path in &diff.removed {
                    eprintln!("  removed  {}", path.display());
                }
                for path in &diff.modified {
                    eprintln!("  modified {}", path.display());
                }
                if diff.reordered {
                    eprintln!("  manifest order changed");
                }
            }
        }
    }
    Ok(0)
}
