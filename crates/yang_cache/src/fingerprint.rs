//! Input fingerprints and change detection.
//!
//! A fingerprint is the ordered list of `(path, mtime)` stamps for every YANG
//! and SID input. The cache is valid only when the current fingerprint equals
//! the stored one exactly; [`FingerprintDiff`] explains a mismatch for logging.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::error::CacheError;

/// One input file and its modification time at resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStamp {
    /// Absolute path of the input.
    pub path: PathBuf,
    /// Last-modified timestamp.
    pub modified: SystemTime,
}

impl FileStamp {
    /// Reads the modification time of `path`.
    pub fn read(path: &Path) -> Result<Self, CacheError> {
        let modified = std::fs::metadata(path)
            .and_then(|m| m.modified())
            .map_err(|e| CacheError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;
        Ok(Self {
            path: path.to_path_buf(),
            modified,
        })
    }
}

/// The identity of a full input set: YANG stamps and SID stamps, each in
/// manifest order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFingerprint {
    /// One stamp per distinct YANG file.
    pub yangs: Vec<FileStamp>,
    /// One stamp per manifest entry.
    pub sids: Vec<FileStamp>,
}

/// How a current fingerprint differs from a stored one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FingerprintDiff {
    /// Inputs not present in the stored fingerprint.
    pub added: Vec<PathBuf>,
    /// Stored inputs no longer present.
    pub removed: Vec<PathBuf>,
    /// Inputs whose modification time changed.
    pub modified: Vec<PathBuf>,
    /// The same inputs are present but listed in a different order.
    pub reordered: bool,
}

impl FingerprintDiff {
    /// Returns `true` if nothing changed.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty() && !self.reordered
    }

    /// Total number of added, removed, and modified inputs.
    pub fn changed_count(&self) -> usize {
        self.added.len() + self.removed.len() + self.modified.len()
    }
}

impl InputFingerprint {
    /// Exact comparison: same files, same order, same timestamps.
    pub fn matches(&self, stored: &InputFingerprint) -> bool {
        self == stored
    }

    /// Describes how `self` differs from `stored`.
    pub fn diff(&self, stored: &InputFingerprint) -> FingerprintDiff {
        let mut diff = FingerprintDiff::default();
        for (current, previous) in [(&self.yangs, &stored.yangs), (&self.sids, &stored.sids)] {
            for stamp in current {
                match previous.iter().find(|p| p.path == stamp.path) {
                    Some(p) if p.modified == stamp.modified => {}
                    Some(_) => diff.modified.push(stamp.path.clone()),
                    None => diff.added.push(stamp.path.clone()),
                }
            }
            diff.removed.extend(
                previous
                    .iter()
                    .filter(|p| !current.iter().any(|c| c.path == p.path))
                    .map(|p| p.path.clone()),
            );
            let same_set = current.len() == previous.len()
                && current.iter().all(|c| previous.iter().any(|p| p.path == c.path));
            if same_set && current.iter().zip(previous).any(|(c, p)| c.path != p.path) {
                diff.reordered = true;
            }
        }

        diff.added.sort();
        diff.removed.sort();
        diff.modified.sort();
        diff
    }
}
