//! Artifact watcher implementation.

use std::path::{Path, PathBuf};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::ARTIFACT_FILE_NAME;
use crate::error::{Result, WatcherError};
use crate::event::{ArtifactEvent, ArtifactEventKind};

/// Buffered events between the notify callback thread and the consumer.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Watches one workspace folder for compilation-database artifacts.
///
/// Events are delivered on the receiver returned by [`ArtifactWatcher::start`].
/// The watcher handle is the subscription: dropping it unwatches the folder
/// and closes the channel.
pub struct ArtifactWatcher {
    /// Workspace folder root being watched.
    root: PathBuf,

    /// Internal notify watcher. Kept alive for the watch duration.
    _watcher: RecommendedWatcher,
}

impl ArtifactWatcher {
    /// Start watching a workspace folder root.
    ///
    /// Only paths matching `<root>/*/compile_commands.json` (exactly one
    /// directory level below the root) produce events; everything else the
    /// file system reports is filtered out before it reaches the channel.
    pub fn start(root: impl Into<PathBuf>) -> Result<(Self, mpsc::Receiver<ArtifactEvent>)> {
        let root = root.into();

        if !root.exists() {
            return Err(WatcherError::FolderNotFound(root.display().to_string()));
        }
        if !root.is_dir() {
            return Err(WatcherError::NotADirectory(root.display().to_string()));
        }

        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let filter_root = root.clone();

        let mut watcher = notify::recommended_watcher(
            move |res: std::result::Result<notify::Event, notify::Error>| match res {
                Ok(event) => {
                    let Some(kind) = ArtifactEventKind::from_notify(event.kind) else {
                        return;
                    };

                    for path in event.paths {
                        if !is_artifact_path(&filter_root, &path) {
                            continue;
                        }

                        debug!("artifact {kind:?}: {}", path.display());
                        if event_tx.blocking_send(ArtifactEvent::new(kind, &path)).is_err() {
                            // Receiver dropped; the watcher is being torn down.
                            debug!("artifact event dropped, channel closed");
                        }
                    }
                }
                Err(e) => error!("watch error: {e}"),
            },
        )?;

        watcher.watch(&root, RecursiveMode::Recursive)?;
        info!("watching for compilation databases under {}", root.display());

        Ok((
            Self {
                root,
                _watcher: watcher,
            },
            event_rx,
        ))
    }

    /// Workspace folder root this watcher covers.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Drop for ArtifactWatcher {
    fn drop(&mut self) {
        let _ = self._watcher.unwatch(&self.root);
        debug!("stopped watching {}", self.root.display());
    }
}

/// Check whether a path is a compilation database exactly one directory
/// level below the folder root.
pub fn is_artifact_path(root: &Path, path: &Path) -> bool {
    if path.file_name() != Some(std::ffi::OsStr::new(ARTIFACT_FILE_NAME)) {
        return false;
    }

    path.parent()
        .and_then(Path::parent)
        .is_some_and(|grandparent| grandparent == root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::time::timeout;

    #[test]
    fn test_artifact_path_filter() {
        let root = Path::new("/proj");

        assert!(is_artifact_path(
            root,
            Path::new("/proj/build/compile_commands.json")
        ));
        assert!(!is_artifact_path(
            root,
            Path::new("/proj/compile_commands.json")
        ));
        assert!(!is_artifact_path(
            root,
            Path::new("/proj/build/debug/compile_commands.json")
        ));
        assert!(!is_artifact_path(root, Path::new("/proj/build/notes.txt")));
        assert!(!is_artifact_path(
            root,
            Path::new("/other/build/compile_commands.json")
        ));
    }

    #[test]
    fn test_start_nonexistent_folder() {
        let result = ArtifactWatcher::start("/nonexistent/path/12345");
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_create_event_delivery() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();
        let build_dir = root.join("build");
        std::fs::create_dir(&build_dir).unwrap();

        let (_watcher, mut events) = ArtifactWatcher::start(&root).unwrap();

        let artifact = build_dir.join("compile_commands.json");
        std::fs::write(&artifact, "[]").unwrap();

        let event = timeout(Duration::from_secs(5), events.recv())
            .await
            .expect("no event within timeout")
            .expect("channel closed");

        assert_eq!(event.path, artifact);
        assert_eq!(event.kind, ArtifactEventKind::Created);
    }

    #[tokio::test]
    async fn test_unrelated_files_filtered() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();
        let build_dir = root.join("build");
        std::fs::create_dir(&build_dir).unwrap();

        let (_watcher, mut events) = ArtifactWatcher::start(&root).unwrap();

        std::fs::write(build_dir.join("CMakeCache.txt"), "x").unwrap();
        std::fs::write(root.join("compile_commands.json"), "[]").unwrap();

        let result = timeout(Duration::from_millis(500), events.recv()).await;
        assert!(result.is_err(), "expected no events for unrelated paths");
    }
}
