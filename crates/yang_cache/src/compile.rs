//! Parallel compilation of YANG files into a [`ModuleSet`].

use std::path::{Path, PathBuf};
use std::process::Command;

use rayon::prelude::*;
use tracing::{debug, info};
use yang_config::CompilerConfig;
use yang_modules::ModuleSet;

use crate::error::CompileError;

/// Captured result of one compiler invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOutput {
    /// Whether the process exited successfully.
    pub success: bool,
    /// Standard output: the YIN text on success.
    pub stdout: String,
    /// Standard error: the diagnostic on failure.
    pub stderr: String,
}

/// An external schema compiler, invoked once per YANG file.
pub trait SchemaCompiler: Send + Sync {
    /// Compiles `schema` with `search_dir` as the module search path.
    ///
    /// An `Err` means the compiler could not be run at all; a compiler that
    /// ran and rejected the file returns `Ok` with `success == false`.
    fn compile(&self, search_dir: &Path, schema: &Path) -> std::io::Result<CompilerOutput>;
}

/// Runs `pyang -W error --format yin --path <dir> <file>`.
#[derive(Debug, Clone)]
pub struct PyangCompiler {
    program: PathBuf,
}

impl PyangCompiler {
    /// Uses `program` as the pyang executable.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Uses the configured compiler program.
    pub fn from_config(config: &CompilerConfig) -> Self {
        Self::new(&config.program)
    }
}

impl SchemaCompiler for PyangCompiler {
    fn compile(&self, search_dir: &Path, schema: &Path) -> std::io::Result<CompilerOutput> {
        let output = Command::new(&self.program)
            .args(["-W", "error", "--format", "yin", "--path"])
            .arg(search_dir)
            .arg(schema)
            .output()?;
        Ok(CompilerOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

fn compile_one(
    compiler: &dyn SchemaCompiler,
    search_dir: &Path,
    schema: &Path,
) -> Result<String, CompileError> {
    debug!(file = %schema.display(), "compiling");
    let output = compiler
        .compile(search_dir, schema)
        .map_err(|e| CompileError::Spawn {
            path: schema.to_path_buf(),
            source: e,
        })?;
    if !output.success {
        return Err(CompileError::Compiler {
            path: schema.to_path_buf(),
            diagnostic: output.stderr.trim_end().to_string(),
        });
    }
    Ok(output.stdout)
}

/// Compiles every YANG file concurrently and returns the outputs in input order.
///
/// Every unit runs to completion. Only then are the results inspected, and
/// the first failure in input order is returned.
fn run_units(
    compiler: &dyn SchemaCompiler,
    search_dir: &Path,
    yangs: &[PathBuf],
    max_jobs: usize,
) -> Result<Vec<String>, CompileError> {
    if yangs.is_empty() {
        return Ok(Vec::new());
    }
    let workers = match max_jobs {
        0 => yangs.len(),
        n => n.min(yangs.len()),
    };
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("yang-compile-{i}"))
        .build()
        .map_err(|e| CompileError::Pool(e.to_string()))?;

    let results: Vec<Result<String, CompileError>> = pool.install(|| {
        yangs
            .par_iter()
            .map(|path| compile_one(compiler, search_dir, path))
            .collect()
    });
    results.into_iter().collect()
}

/// Compiles the YANG files and builds the finalized module set.
///
/// Outputs are added in the order of `yangs`, the schema is computed once,
/// SID files are added in the order of `sids`, and the intermediate YIN
/// text is dropped. Any failure aborts the whole build.
pub fn compile_modules(
    compiler: &dyn SchemaCompiler,
    search_dir: &Path,
    yangs: &[PathBuf],
    sids: &[PathBuf],
    max_jobs: usize,
) -> Result<ModuleSet, CompileError> {
    info!(files = yangs.len(), "compiling YANG modules");
    let outputs = run_units(compiler, search_dir, yangs, max_jobs)?;

    let mut modules = ModuleSet::new();
    for text in &outputs {
        modules.add_module(text)?;
    }
    modules.compute_schema()?;
    for sid in sids {
        modules.add_sid_file(sid)?;
    }
    modules.clear_intermediate_state();
    Ok(modules)
}
