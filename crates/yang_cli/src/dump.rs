//! `yang-schema dump` — print the finalized schema.

use std::fmt::Write;

use yang_modules::{SchemaData, SidNamespace};

use crate::pipeline::load_project;
use crate::{DumpArgs, DumpFormat, GlobalArgs};

/// Runs the `dump` command, compiling first if the cache is stale.
pub fn run(args: &DumpArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (layout, compiler) = load_project(global)?;
    let data = yang_cache::schema_get(&layout, &compiler)?;
    let out = match args.format {
        DumpFormat::Text => render_text(&data),
        DumpFormat::Json => serde_json::to_string_pretty(&data)?,
    };
    println!("{out}");
    Ok(0)
}

/// Renders one line per module followed by one line per SID.
fn render_text(data: &SchemaData) -> String {
    let mut out = String::new();
    for m in &data.modules {
        let _ = write!(out, "module {}", m.name);
        if let Some(rev) = &m.revision {
            let _ = write!(out, "@{rev}");
        }
        let _ = writeln!(out, " {}", m.namespace);
        for sub in &m.submodules {
            let _ = writeln!(out, "  submodule {sub}");
        }
    }
    for item in data.sids.iter() {
        let _ = writeln!(
            out,
            "sid {} {} {}",
            item.sid,
            namespace_label(item.namespace),
            item.identifier
        );
    }
    out.truncate(out.trim_end().len());
    out
}

fn namespace_label(ns: SidNamespace) -> &'static str {
    match ns {
        SidNamespace::Module => "module",
        SidNamespace::Identity => "identity",
        SidNamespace::Feature => "feature",
        SidNamespace::Data => "data",
    }
}
