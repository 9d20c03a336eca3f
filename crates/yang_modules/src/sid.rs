//! SID file parsing.
//!
//! SID files are JSON documents assigning stable numeric identifiers to the
//! items of one YANG module. Both the wrapped form
//! (`{"ietf-sid-file:sid-file": {...}}`) and the bare inner object are
//! accepted, and `sid` values may be JSON numbers or decimal strings.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ModuleError;

/// The kind of schema item a SID is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SidNamespace {
    /// The module itself.
    Module,
    /// An identity.
    Identity,
    /// A feature.
    Feature,
    /// A data node (schema node path).
    Data,
}

/// One SID assignment, tagged with the module that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidItem {
    /// The assigned number.
    pub sid: u64,
    /// Kind of item.
    pub namespace: SidNamespace,
    /// Module name, identity name, feature name, or schema node path.
    pub identifier: String,
    /// Module whose SID file made the assignment.
    pub module: String,
}

/// A parsed SID file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidFile {
    /// `module-name`.
    pub module_name: String,
    /// `module-revision`, if present.
    pub module_revision: Option<String>,
    /// Every `item`, in file order.
    pub items: Vec<SidItem>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SidDocument {
    Wrapped {
        #[serde(rename = "ietf-sid-file:sid-file")]
        sid_file: RawSidFile,
    },
    Bare(RawSidFile),
}

#[derive(Deserialize)]
struct RawSidFile {
    #[serde(rename = "module-name")]
    module_name: String,
    #[serde(rename = "module-revision", default)]
    module_revision: Option<String>,
    #[serde(default)]
    item: Vec<RawItem>,
}

#[derive(Deserialize)]
struct RawItem {
    namespace: SidNamespace,
    identifier: String,
    sid: RawSid,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSid {
    Number(u64),
    Text(String),
}

impl SidFile {
    /// Parses SID JSON text.
    pub fn parse(text: &str) -> Result<Self, String> {
        let doc: SidDocument = serde_json::from_str(text).map_err(|e| e.to_string())?;
        let raw = match doc {
            SidDocument::Wrapped { sid_file } => sid_file,
            SidDocument::Bare(raw) => raw,
        };

        let items = raw
            .item
            .into_iter()
            .map(|item| {
                let sid = match item.sid {
                    RawSid::Number(n) => n,
                    RawSid::Text(s) => s
                        .trim()
                        .parse()
                        .map_err(|_| format!("invalid sid {s:?} for '{}'", item.identifier))?,
                };
                Ok(SidItem {
                    sid,
                    namespace: item.namespace,
                    identifier: item.identifier,
                    module: raw.module_name.clone(),
                })
            })
            .collect::<Result<Vec<_>, String>>()?;

        Ok(Self {
            module_name: raw.module_name,
            module_revision: raw.module_revision,
            items,
        })
    }
}

/// Reads and parses the SID file at `path`.
pub fn read_sid_file(path: &Path) -> Result<SidFile, ModuleError> {
    let text = std::fs::read_to_string(path).map_err(|e| ModuleError::SidFileIo {
        path: path.to_path_buf(),
        source: e,
    })?;
    SidFile::parse(&text).map_err(|reason| ModuleError::SidFileParse {
        path: path.to_path_buf(),
        reason,
    })
}
