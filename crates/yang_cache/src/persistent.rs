//! Public entry points: resolve, compare, then reuse or recompile.

use std::path::{Path, PathBuf};

use tracing::info;
use yang_config::ProjectLayout;
use yang_modules::{ModuleError, ModuleSet, SchemaData};

use crate::compile::{compile_modules, SchemaCompiler};
use crate::error::CacheError;
use crate::fingerprint::FingerprintDiff;
use crate::inputs::{resolve_project, ResolvedInputs};
use crate::store::{CacheRecord, CacheStore};

/// How a [`PersistentSchema`] was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    /// The stored record matched and was reused.
    Hit,
    /// There was no usable cache file; the set was compiled.
    Absent,
    /// The stored fingerprint differed; the set was recompiled.
    Stale,
}

/// Cache state reported without compiling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheStatus {
    /// The stored record matches the current inputs.
    Fresh,
    /// The stored record was built from different inputs.
    Stale(FingerprintDiff),
    /// No usable cache file.
    Absent,
}

/// A module set that is current with respect to the project inputs.
#[derive(Debug)]
pub struct PersistentSchema {
    modules: ModuleSet,
    outcome: CacheOutcome,
}

impl PersistentSchema {
    /// Resolves the project inputs and returns the cached module set if it
    /// is current, otherwise recompiles and stores a new record.
    pub fn open(layout: &ProjectLayout, compiler: &dyn SchemaCompiler) -> Result<Self, CacheError> {
        let inputs = resolve_project(layout)?;
        let store = CacheStore::new(&layout.cache_file);
        Self::open_with(
            &inputs,
            &layout.yang_dir,
            &store,
            compiler,
            layout.compiler.max_jobs,
        )
    }

    /// [`PersistentSchema::open`] with already-resolved inputs and an explicit store.
    pub fn open_with(
        inputs: &ResolvedInputs,
        search_dir: &Path,
        store: &CacheStore,
        compiler: &dyn SchemaCompiler,
        max_jobs: usize,
    ) -> Result<Self, CacheError> {
        let fingerprint = inputs.fingerprint();
        let outcome = match store.load()? {
            Some(record) if fingerprint.matches(&record.fingerprint) => {
                info!(path = %store.path().display(), "schema cache hit");
                return Ok(Self {
                    modules: record.modules,
                    outcome: CacheOutcome::Hit,
                });
            }
            Some(record) => {
                let diff = fingerprint.diff(&record.fingerprint);
                info!(
                    added = diff.added.len(),
                    removed = diff.removed.len(),
                    modified = diff.modified.len(),
                    reordered = diff.reordered,
                    "schema cache stale"
                );
                CacheOutcome::Stale
            }
            None => {
                info!(path = %store.path().display(), "schema cache absent");
                CacheOutcome::Absent
            }
        };

        let modules = compile_modules(
            compiler,
            search_dir,
            &inputs.yang_paths(),
            &inputs.sid_paths(),
            max_jobs,
        )?;
        let record = CacheRecord {
            fingerprint,
            modules,
        };
        store.store(&record)?;
        Ok(Self {
            modules: record.modules,
            outcome,
        })
    }

    /// Whether the set came from the cache.
    pub fn outcome(&self) -> CacheOutcome {
        self.outcome
    }

    /// The module set.
    pub fn modules(&self) -> &ModuleSet {
        &self.modules
    }

    /// The finalized schema.
    pub fn schema_data(&self) -> Result<&SchemaData, CacheError> {
        self.modules
            .schema_data()
            .ok_or(CacheError::Module(ModuleError::SchemaNotComputed))
    }

    /// Consumes `self`, returning the module set.
    pub fn into_modules(self) -> ModuleSet {
        self.modules
    }
}

/// Returns the finalized schema for the project, compiling only if the
/// cache is not current.
pub fn schema_get(layout: &ProjectLayout, compiler: &dyn SchemaCompiler) -> Result<SchemaData, CacheError> {
    PersistentSchema::open(layout, compiler)?
        .into_modules()
        .into_schema_data()
        .ok_or(CacheError::Module(ModuleError::SchemaNotComputed))
}

/// Returns the module set for the project, compiling only if the cache is
/// not current.
pub fn modules_get(layout: &ProjectLayout, compiler: &dyn SchemaCompiler) -> Result<ModuleSet, CacheError> {
    Ok(PersistentSchema::open(layout, compiler)?.into_modules())
}

/// Compiles the given inputs and returns the finalized schema without
/// reading or writing any cache.
pub fn generate_schema(
    compiler: &dyn SchemaCompiler,
    search_dir: &Path,
    yangs: &[PathBuf],
    sids: &[PathBuf],
    max_jobs: usize,
) -> Result<SchemaData, CacheError> {
    compile_modules(compiler, search_dir, yangs, sids, max_jobs)?
        .into_schema_data()
        .ok_or(CacheError::Module(ModuleError::SchemaNotComputed))
}

/// Compares the project inputs against the cache without compiling.
pub fn check_status(layout: &ProjectLayout) -> Result<CacheStatus, CacheError> {
    let fingerprint = resolve_project(layout)?.fingerprint();
    Ok(match CacheStore::new(&layout.cache_file).load()? {
        Some(record) if fingerprint.matches(&record.fingerprint) => CacheStatus::Fresh,
        Some(record) => CacheStatus::Stale(fingerprint.diff(&record.fingerprint)),
        None => CacheStatus::Absent,
    })
}
