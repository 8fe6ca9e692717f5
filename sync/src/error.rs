//! Error types for compilation-database synchronization.

use thiserror::Error;

/// Result type alias for synchronization operations.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Errors that can occur while synchronizing compilation databases.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The normalization tool could not be spawned.
    #[error("normalizer unavailable: {0}")]
    NormalizerUnavailable(String),

    /// The normalization tool ran but reported failure.
    #[error("normalizer exited with {status}: {stderr}")]
    NormalizerFailed {
        status: std::process::ExitStatus,
        stderr: String,
    },

    /// Normalizer output was not a structurally valid compilation database.
    #[error("malformed compilation database: {0}")]
    MalformedDatabase(#[from] serde_json::Error),

    /// No synchronizer is registered for the folder.
    #[error("unknown workspace folder: {0}")]
    UnknownFolder(String),

    /// A synchronizer is already registered for the folder.
    #[error("workspace folder already registered: {0}")]
    AlreadyRegistered(String),

    /// Watcher error.
    #[error("watcher error: {0}")]
    Watcher(#[from] compdb_watcher::WatcherError),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
