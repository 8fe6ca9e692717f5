//! # Compilation-Database Artifact Watcher
//!
//! This crate watches a workspace folder for compilation-database files
//! (`compile_commands.json`) produced one directory level below the folder
//! root, which is where build-directory generation drops them.
//!
//! Raw file-system notifications are filtered down to the artifact pattern
//! and delivered as typed [`ArtifactEvent`]s over a channel. Dropping the
//! [`ArtifactWatcher`] handle unwatches the folder and closes the channel,
//! so consumers observe teardown as end-of-stream.

pub mod error;
pub mod event;
pub mod watcher;

pub use error::{Result, WatcherError};
pub use event::{ArtifactEvent, ArtifactEventKind};
pub use watcher::ArtifactWatcher;

/// Well-known file name of a compilation database.
pub const ARTIFACT_FILE_NAME: &str = "compile_commands.json";
