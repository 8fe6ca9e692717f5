//! Error types for the artifact watcher.

use thiserror::Error;

/// Result type alias for watcher operations.
pub type Result<T> = std::result::Result<T, WatcherError>;

/// Errors that can occur while watching a workspace folder.
#[derive(Error, Debug)]
pub enum WatcherError {
    /// Workspace folder does not exist.
    #[error("workspace folder not found: {0}")]
    FolderNotFound(String),

    /// Watch target is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// Notify error.
    #[error("notify error: {0}")]
    Notify(#[from] notify::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
