//! The mutable module aggregate.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ModuleError;
use crate::schema::{ModuleInfo, SchemaData};
use crate::sid::read_sid_file;
use crate::yin::{scan_header, ModuleKind, YinHeader};

/// A compiled module: its header plus, until cleared, the raw YIN text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CompiledModule {
    header: YinHeader,
    yin: Option<String>,
}

/// The collection of compiled modules and the schema derived from them.
///
/// Build order is `add_module` for every compiler output, one
/// `compute_schema`, `add_sid_file` for every SID file, then
/// `clear_intermediate_state`. Adding a module after the schema was computed
/// discards the computed schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSet {
    modules: Vec<CompiledModule>,
    schema: Option<SchemaData>,
}

impl ModuleSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one compiled module from its YIN text.
    pub fn add_module(&mut self, yin: &str) -> Result<(), ModuleError> {
        let header = scan_header(yin)?;
        if self.modules.iter().any(|m| m.header.name == header.name) {
            return Err(ModuleError::DuplicateModule { name: header.name });
        }
        debug!(module = %header.name, "adding module");
        self.schema = None;
        self.modules.push(CompiledModule {
            header,
            yin: Some(yin.to_string()),
        });
        Ok(())
    }

    /// Links all added modules into the finalized schema.
    ///
    /// Submodules are folded into the module they belong to. Module order
    /// follows insertion order.
    pub fn compute_schema(&mut self) -> Result<&SchemaData, ModuleError> {
        let mut data = SchemaData::default();
        for m in self.modules.iter().filter(|m| m.header.kind == ModuleKind::Module) {
            let h = &m.header;
            data.modules.push(ModuleInfo {
                name: h.name.clone(),
                namespace: h.namespace.clone().unwrap_or_default(),
                prefix: h.prefix.clone(),
                revision: h.revision.clone(),
                submodules: Vec::new(),
                imports: h.imports.clone(),
                sid_revision: None,
            });
        }

        for m in self
            .modules
            .iter()
            .filter(|m| m.header.kind == ModuleKind::Submodule)
        {
            let h = &m.header;
            let parent_name = h.belongs_to.clone().unwrap_or_default();
            let parent = data
                .modules
                .iter_mut()
                .find(|p| p.name == parent_name)
                .ok_or_else(|| ModuleError::UnknownParent {
                    submodule: h.name.clone(),
                    parent: parent_name.clone(),
                })?;
            parent.submodules.push(h.name.clone());
            for import in &h.imports {
                if !parent.imports.contains(import) {
                    parent.imports.push(import.clone());
                }
            }
        }

        Ok(&*self.schema.insert(data))
    }

    /// Reads a SID file and merges its assignments into the computed schema.
    pub fn add_sid_file(&mut self, path: &Path) -> Result<(), ModuleError> {
        let schema = self.schema.as_mut().ok_or(ModuleError::SchemaNotComputed)?;
        let file = read_sid_file(path)?;
        debug!(path = %path.display(), items = file.items.len(), "adding SID file");
        schema.apply_sid_file(path, file)
    }

    /// Drops the YIN text retained for each module.
    pub fn clear_intermediate_state(&mut self) {
        for m in &mut self.modules {
            m.yin = None;
        }
    }

    /// Returns `true` while any module still holds its YIN text.
    pub fn has_intermediate_state(&self) -> bool {
        self.modules.iter().any(|m| m.yin.is_some())
    }

    /// The finalized schema, if it has been computed.
    pub fn schema_data(&self) -> Option<&SchemaData> {
        self.schema.as_ref()
    }

    /// Consumes the set and returns the finalized schema, if computed.
    pub fn into_schema_data(self) -> Option<SchemaData> {
        self.schema
    }

    /// Names of all added modules and submodules, in insertion order.
    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.modules.iter().map(|m| m.header.name.as_str())
    }

    /// Number of added modules and submodules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Returns `true` if no modules were added.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
