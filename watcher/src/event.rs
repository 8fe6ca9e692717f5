//! Typed events for compilation-database artifacts.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A create/change/delete observation for a compilation-database file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactEvent {
    /// The kind of event.
    pub kind: ArtifactEventKind,

    /// Absolute path of the affected artifact.
    pub path: PathBuf,

    /// When the event was observed.
    pub timestamp: DateTime<Utc>,
}

impl ArtifactEvent {
    /// Create a new artifact event.
    pub fn new(kind: ArtifactEventKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Kind of artifact event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactEventKind {
    /// Artifact was created.
    Created,

    /// Artifact content changed.
    Changed,

    /// Artifact was deleted.
    Deleted,
}

impl ArtifactEventKind {
    /// Map a raw notify event kind onto the artifact event model.
    ///
    /// Renames count as create (new name) or delete (old name); access and
    /// metadata-only events carry no content change and are dropped.
    pub fn from_notify(kind: notify::EventKind) -> Option<Self> {
        match kind {
            notify::EventKind::Create(_) => Some(Self::Created),
            notify::EventKind::Modify(modify_kind) => match modify_kind {
                notify::event::ModifyKind::Name(rename) => match rename {
                    notify::event::RenameMode::From => Some(Self::Deleted),
                    notify::event::RenameMode::To => Some(Self::Created),
                    _ => Some(Self::Changed),
                },
                notify::event::ModifyKind::Metadata(_) => None,
                _ => Some(Self::Changed),
            },
            notify::EventKind::Remove(_) => Some(Self::Deleted),
            notify::EventKind::Access(_) => None,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    #[test]
    fn test_artifact_event_creation() {
        let event = ArtifactEvent::new(ArtifactEventKind::Created, "/proj/build/compile_commands.json");
        assert_eq!(event.kind, ArtifactEventKind::Created);
        assert_eq!(event.path, Path::new("/proj/build/compile_commands.json"));
    }

    #[test]
    fn test_notify_kind_mapping() {
        use notify::EventKind;
        use notify::event::{AccessKind, CreateKind, ModifyKind, RemoveKind, RenameMode};

        assert_eq!(
            ArtifactEventKind::from_notify(EventKind::Create(CreateKind::File)),
            Some(ArtifactEventKind::Created)
        );
        assert_eq!(
            ArtifactEventKind::from_notify(EventKind::Modify(ModifyKind::Data(
                notify::event::DataChange::Content
            ))),
            Some(ArtifactEventKind::Changed)
        );
        assert_eq!(
            ArtifactEventKind::from_notify(EventKind::Remove(RemoveKind::File)),
            Some(ArtifactEventKind::Deleted)
        );
        assert_eq!(
            ArtifactEventKind::from_notify(EventKind::Modify(ModifyKind::Name(RenameMode::To))),
            Some(ArtifactEventKind::Created)
        );
        assert_eq!(
            ArtifactEventKind::from_notify(EventKind::Modify(ModifyKind::Name(RenameMode::From))),
            Some(ArtifactEventKind::Deleted)
        );
        assert_eq!(
            ArtifactEventKind::from_notify(EventKind::Access(AccessKind::Read)),
            None
        );
    }
}
