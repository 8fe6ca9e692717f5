//! Workspace-wide folder to synchronizer mapping.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use compdb_watcher::{ArtifactEvent, ArtifactEventKind, ArtifactWatcher};
use tokio::sync::{RwLock, mpsc};
use tracing::{debug, error, info, warn};

use crate::client::LanguageClient;
use crate::error::{Result, SyncError};
use crate::normalizer::Normalizer;
use crate::oracle::BuildDirectoryOracle;
use crate::synchronizer::FolderSynchronizer;
use crate::workspace::{WorkspaceFolder, WorkspaceFoldersChange};

/// A registered folder: its synchronizer, its watcher subscription, and the
/// task pumping watcher events into the synchronizer.
struct FolderEntry {
    synchronizer: Arc<FolderSynchronizer>,

    /// Dropping the watcher closes the event channel, which ends the pump
    /// after any in-flight reconciliation finishes. Remote folders have
    /// nothing local to watch.
    _watcher: Option<ArtifactWatcher>,
}

/// Owns one [`FolderSynchronizer`] per workspace folder for the lifetime of
/// the workspace session.
pub struct WorkspaceCoordinator {
    oracle: Arc<dyn BuildDirectoryOracle>,
    normalizer: Arc<dyn Normalizer>,
    client: Arc<dyn LanguageClient>,

    /// Synchronizers keyed by folder root.
    folders: RwLock<HashMap<PathBuf, FolderEntry>>,
}

impl WorkspaceCoordinator {
    /// Create an empty coordinator.
    pub fn new(
        oracle: Arc<dyn BuildDirectoryOracle>,
        normalizer: Arc<dyn Normalizer>,
        client: Arc<dyn LanguageClient>,
    ) -> Self {
        Self {
            oracle,
            normalizer,
            client,
            folders: RwLock::new(HashMap::new()),
        }
    }

    /// Register a folder and start watching it.
    pub async fn add_folder(&self, folder: WorkspaceFolder) -> Result<()> {
        let root = folder.root.clone();

        {
            let folders = self.folders.read().await;
            if folders.contains_key(&root) {
                return Err(SyncError::AlreadyRegistered(root.display().to_string()));
            }
        }

        let synchronizer = Arc::new(FolderSynchronizer::new(
            folder.clone(),
            self.oracle.clone(),
            self.normalizer.clone(),
            self.client.clone(),
        ));

        let watcher = if folder.is_local() {
            let (watcher, events) = ArtifactWatcher::start(&root)?;
            tokio::spawn(pump_events(events, synchronizer.clone()));
            Some(watcher)
        } else {
            debug!(
                "folder {} uses scheme {}, not watching",
                root.display(),
                folder.scheme
            );
            None
        };

        info!("managing workspace folder {}", root.display());
        self.folders.write().await.insert(
            root,
            FolderEntry {
                synchronizer,
                _watcher: watcher,
            },
        );

        Ok(())
    }

    /// Drop a folder's synchronizer and watcher.
    ///
    /// In-flight reconciliations are not cancelled; a late write to the
    /// now-unmanaged folder root is accepted drift.
    pub async fn remove_folder(&self, folder_root: &Path) -> Result<()> {
        let removed = self.folders.write().await.remove(folder_root);

        if removed.is_none() {
            return Err(SyncError::UnknownFolder(folder_root.display().to_string()));
        }

        info!("released workspace folder {}", folder_root.display());
        Ok(())
    }

    /// Apply a folder membership change reported by the host.
    pub async fn folders_changed(&self, change: &WorkspaceFoldersChange) {
        for folder in &change.removed {
            if let Err(e) = self.remove_folder(&folder.root).await {
                warn!("removing folder {}: {e}", folder.root.display());
            }
        }

        for folder in &change.added {
            if let Err(e) = self.add_folder(folder.clone()).await {
                warn!("adding folder {}: {e}", folder.root.display());
            }
        }
    }

    /// Reconciliation driven by the build-system integration.
    ///
    /// Dispatches to the synchronizer whose folder root matches; a request
    /// for an unmanaged folder is logged and dropped.
    pub async fn run_synchronization(&self, folder_root: &Path, build_dir: &Path) -> Result<()> {
        let synchronizer = {
            let folders = self.folders.read().await;
            folders.get(folder_root).map(|e| e.synchronizer.clone())
        };

        match synchronizer {
            Some(synchronizer) => synchronizer.run_synchronization(build_dir).await,
            None => {
                debug!(
                    "no synchronizer for folder {}, dropping reconfiguration",
                    folder_root.display()
                );
                Ok(())
            }
        }
    }

    /// Roots of all managed folders.
    pub async fn folder_roots(&self) -> Vec<PathBuf> {
        self.folders.read().await.keys().cloned().collect()
    }

    /// The synchronizer for a folder root, if managed.
    pub async fn synchronizer(&self, folder_root: &Path) -> Option<Arc<FolderSynchronizer>> {
        self.folders
            .read()
            .await
            .get(folder_root)
            .map(|e| e.synchronizer.clone())
    }
}

/// Forward watcher events to the owning synchronizer until the watcher is
/// dropped and the channel closes.
async fn pump_events(mut events: mpsc::Receiver<ArtifactEvent>, synchronizer: Arc<FolderSynchronizer>) {
    while let Some(event) = events.recv().await {
        let result = match event.kind {
            ArtifactEventKind::Created => synchronizer.on_source_created(&event.path).await,
            ArtifactEventKind::Changed => synchronizer.on_source_changed(&event.path).await,
            ArtifactEventKind::Deleted => {
                synchronizer.on_source_deleted(&event.path).await;
                Ok(())
            }
        };

        if let Err(e) = result {
            error!("reconciliation failed for {}: {e}", event.path.display());
        }
    }

    debug!(
        "event pump stopped for {}",
        synchronizer.folder().root.display()
    );
}
