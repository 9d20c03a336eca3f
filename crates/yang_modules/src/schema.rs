//! The finalized, queryable schema.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ModuleError;
use crate::sid::{SidFile, SidItem, SidNamespace};

/// One top-level module after linking, with its submodules folded in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleInfo {
    /// Module name.
    pub name: String,
    /// XML namespace URI.
    pub namespace: String,
    /// Module prefix.
    pub prefix: Option<String>,
    /// Latest revision date.
    pub revision: Option<String>,
    /// Submodules belonging to this module, in the order they were added.
    pub submodules: Vec<String>,
    /// Modules imported by this module or any of its submodules.
    pub imports: Vec<String>,
    /// Revision recorded in this module's SID file, once one was added.
    pub sid_revision: Option<String>,
}

/// SID assignments across all modules.
///
/// Persisted as the flat list of items; the identifier index is rebuilt on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<SidItem>", into = "Vec<SidItem>")]
pub struct SidIndex {
    by_sid: BTreeMap<u64, SidItem>,
    by_identifier: BTreeMap<(SidNamespace, String), u64>,
}

impl SidIndex {
    /// Number of assigned SIDs.
    pub fn len(&self) -> usize {
        self.by_sid.len()
    }

    /// Returns `true` if no SIDs are assigned.
    pub fn is_empty(&self) -> bool {
        self.by_sid.is_empty()
    }

    /// Looks up the item assigned to `sid`.
    pub fn item(&self, sid: u64) -> Option<&SidItem> {
        self.by_sid.get(&sid)
    }

    /// Looks up the SID assigned to an identifier.
    pub fn sid(&self, namespace: SidNamespace, identifier: &str) -> Option<u64> {
        self.by_identifier
            .get(&(namespace, identifier.to_string()))
            .copied()
    }

    /// Iterates assignments in SID order.
    pub fn iter(&self) -> impl Iterator<Item = &SidItem> {
        self.by_sid.values()
    }

    fn insert(&mut self, item: SidItem) -> Result<(), ModuleError> {
        if let Some(existing) = self.by_sid.get(&item.sid) {
            if existing.namespace != item.namespace || existing.identifier != item.identifier {
                return Err(ModuleError::SidConflict {
                    sid: item.sid,
                    existing: existing.identifier.clone(),
                    conflicting: item.identifier,
                });
            }
            return Ok(());
        }
        let key = (item.namespace, item.identifier.clone());
        if let Some(&existing) = self.by_identifier.get(&key) {
            return Err(ModuleError::IdentifierConflict {
                identifier: item.identifier,
                existing,
                conflicting: item.sid,
            });
        }
        self.by_identifier.insert(key, item.sid);
        self.by_sid.insert(item.sid, item);
        Ok(())
    }
}

impl From<Vec<SidItem>> for SidIndex {
    fn from(items: Vec<SidItem>) -> Self {
        let mut index = Self::default();
        for item in items {
            index
                .by_identifier
                .insert((item.namespace, item.identifier.clone()), item.sid);
            index.by_sid.insert(item.sid, item);
        }
        index
    }
}

impl From<SidIndex> for Vec<SidItem> {
    fn from(index: SidIndex) -> Self {
        index.by_sid.into_values().collect()
    }
}

/// The finalized schema: linked modules plus SID assignments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaData {
    /// Top-level modules in the order they were added.
    pub modules: Vec<ModuleInfo>,
    /// SID assignments from every SID file added so far.
    pub sids: SidIndex,
}

impl SchemaData {
    /// Returns the module named `name`.
    pub fn module(&self, name: &str) -> Option<&ModuleInfo> {
        self.modules.iter().find(|m| m.name == name)
    }

    pub(crate) fn apply_sid_file(
        &mut self,
        path: &std::path::Path,
        file: SidFile,
    ) -> Result<(), ModuleError> {
        let module = self
            .modules
            .iter_mut()
            .find(|m| m.name == file.module_name)
            .ok_or_else(|| ModuleError::UnknownSidModule {
                path: path.to_path_buf(),
                module: file.module_name.clone(),
            })?;
        module.sid_revision = file.module_revision;
        for item in file.items {
            self.sids.insert(item)?;
        }
        Ok(())
    }
}
