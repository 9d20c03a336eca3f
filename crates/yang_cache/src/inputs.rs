//! Manifest resolution: SID file names to stamped YANG and SID inputs.

use std::path::{Path, PathBuf};

use tracing::debug;
use yang_config::{load_manifest, ProjectLayout, SidManifest};

use crate::error::CacheError;
use crate::fingerprint::{FileStamp, InputFingerprint};

/// Extension of the YANG file paired with each SID file.
const SCHEMA_EXT: &str = "yang";

/// The stamped inputs of a project, in manifest order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInputs {
    /// Distinct YANG files, ordered by first mention.
    pub yangs: Vec<FileStamp>,
    /// One SID file per manifest entry.
    pub sids: Vec<FileStamp>,
}

impl ResolvedInputs {
    /// The fingerprint identifying this input set.
    pub fn fingerprint(&self) -> InputFingerprint {
        InputFingerprint {
            yangs: self.yangs.clone(),
            sids: self.sids.clone(),
        }
    }

    /// YANG file paths in compile order.
    pub fn yang_paths(&self) -> Vec<PathBuf> {
        self.yangs.iter().map(|s| s.path.clone()).collect()
    }

    /// SID file paths in manifest order.
    pub fn sid_paths(&self) -> Vec<PathBuf> {
        self.sids.iter().map(|s| s.path.clone()).collect()
    }
}

/// Derives the YANG file name from a SID file name: the part before the
/// first `@`, with a `.yang` extension.
pub fn schema_file_name(sid_file: &str) -> String {
    let module = sid_file.split('@').next().unwrap_or(sid_file);
    format!("{module}.{SCHEMA_EXT}")
}

/// Resolves every manifest entry against `yang_dir`.
///
/// Stops at the first missing file.
pub fn resolve_inputs(manifest: &SidManifest, yang_dir: &Path) -> Result<ResolvedInputs, CacheError> {
    let mut yangs: Vec<FileStamp> = Vec::new();
    let mut sids = Vec::with_capacity(manifest.sid_files.len());

    for entry in &manifest.sid_files {
        let sid_path = yang_dir.join(entry);
        if !sid_path.exists() {
            return Err(CacheError::MissingSidFile { path: sid_path });
        }
        sids.push(FileStamp::read(&sid_path)?);

        let yang_path = yang_dir.join(schema_file_name(entry));
        if !yang_path.exists() {
            return Err(CacheError::MissingSchemaFile { path: yang_path });
        }
        if !yangs.iter().any(|s| s.path == yang_path) {
            yangs.push(FileStamp::read(&yang_path)?);
        }
    }

    debug!(yangs = yangs.len(), sids = sids.len(), "resolved inputs");
    Ok(ResolvedInputs { yangs, sids })
}

/// Loads the project's manifest and resolves it.
pub fn resolve_project(layout: &ProjectLayout) -> Result<ResolvedInputs, CacheError> {
    let manifest = load_manifest(&layout.manifest)?;
    resolve_inputs(&manifest, &layout.yang_dir)
}
