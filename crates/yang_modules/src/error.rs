//! Error types for module collection operations.

use std::path::PathBuf;

/// Errors raised while building a [`crate::ModuleSet`].
#[derive(Debug, thiserror::Error)]
pub enum ModuleError {
    /// Compiler output did not contain a recognizable module header.
    #[error("invalid module text: {reason}")]
    InvalidModule {
        /// Description of what was missing or malformed.
        reason: String,
    },

    /// Two modules with the same name were added.
    #[error("module '{name}' added more than once")]
    DuplicateModule {
        /// The repeated module name.
        name: String,
    },

    /// A submodule names a parent module that is not in the set.
    #[error("submodule '{submodule}' belongs to unknown module '{parent}'")]
    UnknownParent {
        /// The submodule name.
        submodule: String,
        /// The missing parent module name.
        parent: String,
    },

    /// An operation required a finalized schema but none was computed.
    #[error("schema has not been computed")]
    SchemaNotComputed,

    /// A SID file could not be read.
    #[error("failed to read SID file {path}: {source}")]
    SidFileIo {
        /// The SID file path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A SID file is not valid SID JSON.
    #[error("failed to parse SID file {path}: {reason}")]
    SidFileParse {
        /// The SID file path.
        path: PathBuf,
        /// Description of the parse failure.
        reason: String,
    },

    /// A SID file describes a module that is not part of the schema.
    #[error("SID file {path} describes unknown module '{module}'")]
    UnknownSidModule {
        /// The SID file path.
        path: PathBuf,
        /// The module name declared by the SID file.
        module: String,
    },

    /// One SID number was assigned to two different items.
    #[error("SID {sid} assigned to both '{existing}' and '{conflicting}'")]
    SidConflict {
        /// The contested SID.
        sid: u64,
        /// Identifier already holding the SID.
        existing: String,
        /// Identifier that tried to claim it.
        conflicting: String,
    },

    /// One identifier was assigned two different SID numbers.
    #[error("'{identifier}' assigned both SID {existing} and SID {conflicting}")]
    IdentifierConflict {
        /// The contested identifier.
        identifier: String,
        /// SID already assigned to it.
        existing: u64,
        /// SID that tried to replace it.
        conflicting: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_module_display() {
        let err = ModuleError::DuplicateModule {
            name: "ietf-interfaces".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "module 'ietf-interfaces' added more than once"
        );
    }

    #[test]
    fn sid_conflict_display() {
        let err = ModuleError::SidConflict {
            sid: 1000,
            existing: "/a:x".to_string(),
            conflicting: "/b:y".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("1000"));
        assert!(msg.contains("/a:x"));
        assert!(msg.contains("/b:y"));
    }

    #[test]
    fn unknown_sid_module_display() {
        let err = ModuleError::UnknownSidModule {
            path: PathBuf::from("yang/c@2021.sid"),
            module: "c".to_string(),
        };
        assert!(err.to_string().contains("c@2021.sid"));
    }
}
