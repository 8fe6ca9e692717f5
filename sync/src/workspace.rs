//! Workspace folder identity and folder-change payloads.
//!
//! The host editor reports folders and folder membership changes as loosely
//! typed payloads; they are validated into these structures at the boundary.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// URI scheme of folders on the local file system.
pub const LOCAL_SCHEME: &str = "file";

/// Identity of a root directory under management.
///
/// Each folder owns exactly one synchronizer for as long as it is part of
/// the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkspaceFolder {
    /// Display name reported by the host.
    pub name: String,

    /// Absolute path of the folder root.
    pub root: PathBuf,

    /// URI scheme of the folder. Anything other than `file` is a
    /// remote/virtual source and is only recognized, not synchronized.
    pub scheme: String,
}

impl WorkspaceFolder {
    /// Create a local (on-disk) workspace folder.
    pub fn local(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
            scheme: LOCAL_SCHEME.to_string(),
        }
    }

    /// Create a folder backed by a non-local file system.
    pub fn remote(name: impl Into<String>, root: impl Into<PathBuf>, scheme: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
            scheme: scheme.into(),
        }
    }

    /// Whether the folder lives on the local file system.
    pub fn is_local(&self) -> bool {
        self.scheme == LOCAL_SCHEME
    }
}

/// A change to workspace folder membership.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkspaceFoldersChange {
    /// Folders that joined the workspace.
    pub added: Vec<WorkspaceFolder>,

    /// Folders that left the workspace.
    pub removed: Vec<WorkspaceFolder>,
}
