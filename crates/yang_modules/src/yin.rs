//! Header extraction from YIN documents.
//!
//! The compiler emits each module as YIN (the XML form of YANG). Only the
//! module header is needed to link modules and attach SID files, so this is a
//! tag scanner rather than a full XML parser: it finds start tags by name and
//! reads their quoted attributes.

use serde::{Deserialize, Serialize};

use crate::error::ModuleError;

/// Whether a YIN document describes a module or a submodule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModuleKind {
    /// A top-level `module`.
    Module,
    /// A `submodule` that belongs to another module.
    Submodule,
}

/// The identifying statements of one compiled module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YinHeader {
    /// Module or submodule.
    pub kind: ModuleKind,
    /// The `name` attribute of the root element.
    pub name: String,
    /// `namespace uri`, present for modules.
    pub namespace: Option<String>,
    /// The first `prefix value` in the document.
    pub prefix: Option<String>,
    /// The most recent `revision date` (the first one listed).
    pub revision: Option<String>,
    /// `belongs-to module`, present for submodules.
    pub belongs_to: Option<String>,
    /// Every `import module`, in document order.
    pub imports: Vec<String>,
}

/// Scans a YIN document and returns its header.
pub fn scan_header(text: &str) -> Result<YinHeader, ModuleError> {
    let (kind, root) = match start_tags(text, "submodule").into_iter().next() {
        Some(tag) => (ModuleKind::Submodule, tag),
        None => match start_tags(text, "module").into_iter().next() {
            Some(tag) => (ModuleKind::Module, tag),
            None => {
                return Err(ModuleError::InvalidModule {
                    reason: "no <module> or <submodule> element".to_string(),
                })
            }
        },
    };

    let name = attr(root, "name").ok_or_else(|| ModuleError::InvalidModule {
        reason: "root element has no name attribute".to_string(),
    })?;

    let first_attr = |tag: &str, key: &str| {
        start_tags(text, tag)
            .into_iter()
            .next()
            .and_then(|t| attr(t, key))
    };

    let header = YinHeader {
        kind,
        namespace: first_attr("namespace", "uri"),
        prefix: first_attr("prefix", "value"),
        revision: first_attr("revision", "date"),
        belongs_to: first_attr("belongs-to", "module"),
        imports: start_tags(text, "import")
            .into_iter()
            .filter_map(|t| attr(t, "module"))
            .collect(),
        name,
    };

    if header.kind == ModuleKind::Module && header.namespace.is_none() {
        return Err(ModuleError::InvalidModule {
            reason: format!("module '{}' has no namespace", header.name),
        });
    }
    if header.kind == ModuleKind::Submodule && header.belongs_to.is_none() {
        return Err(ModuleError::InvalidModule {
            reason: format!("submodule '{}' has no belongs-to", header.name),
        });
    }
    Ok(header)
}

/// Returns the attribute text of every `<tag ...>` start tag, in order.
fn start_tags<'a>(text: &'a str, tag: &str) -> Vec<&'a str> {
    let needle = format!("<{tag}");
    let mut tags = Vec::new();
    let mut rest = text;
    while let Some(pos) = rest.find(&needle) {
        let after = &rest[pos + needle.len()..];
        match after.chars().next() {
            Some(c) if c.is_whitespace() || c == '>' || c == '/' => {
                let end = after.find('>').unwrap_or(after.len());
                tags.push(after[..end].trim_end_matches('/'));
                rest = &after[end..];
            }
            _ => rest = after,
        }
    }
    tags
}

/// Reads a single- or double-quoted attribute value from start-tag text.
fn attr(tag: &str, key: &str) -> Option<String> {
    let mut rest = tag;
    while let Some(pos) = rest.find(key) {
        let at_boundary = rest[..pos]
            .chars()
            .next_back()
            .map_or(true, char::is_whitespace);
        let after = &rest[pos + key.len()..];
        if at_boundary {
            if let Some(value) = after.trim_start().strip_prefix('=') {
                let value = value.trim_start();
                let quote = value.chars().next()?;
                if quote == '"' || quote == '\'' {
                    let body = &value[1..];
                    let end = body.find(quote)?;
                    return Some(unescape(&body[..end]));
                }
            }
        }
        rest = after;
    }
    None
}

fn unescape(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
