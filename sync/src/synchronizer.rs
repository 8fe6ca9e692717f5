//! Per-folder reconciliation of the published compilation database.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use compdb_watcher::ARTIFACT_FILE_NAME;
use tokio::fs;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::client::LanguageClient;
use crate::error::Result;
use crate::normalizer::Normalizer;
use crate::oracle::BuildDirectoryOracle;
use crate::workspace::WorkspaceFolder;

/// Keeps one workspace folder's published compilation database consistent
/// with the database produced in its currently active build directory.
///
/// Watcher events and build-system reconfigurations both funnel into the
/// same reconciliation: normalize the active build directory's database,
/// compare it structurally against what is already published at the folder
/// root, and rewrite the artifact only on a difference. A language-server
/// restart is requested only when the artifact is created for the first
/// time; the server tracks in-place updates by itself.
pub struct FolderSynchronizer {
    /// The folder this synchronizer owns.
    folder: WorkspaceFolder,

    /// Active-build-directory lookup, queried fresh on every trigger.
    oracle: Arc<dyn BuildDirectoryOracle>,

    /// External normalization tool.
    normalizer: Arc<dyn Normalizer>,

    /// Restart signal for the dependent language server.
    client: Arc<dyn LanguageClient>,

    /// Observed compilation-database sources. Advisory bookkeeping only;
    /// the publish decision never consults it.
    candidates: RwLock<HashSet<PathBuf>>,

    /// Serializes reconciliations so triggers apply in order.
    reconcile_lock: Mutex<()>,
}

impl FolderSynchronizer {
    /// Create a synchronizer for a workspace folder.
    pub fn new(
        folder: WorkspaceFolder,
        oracle: Arc<dyn BuildDirectoryOracle>,
        normalizer: Arc<dyn Normalizer>,
        client: Arc<dyn LanguageClient>,
    ) -> Self {
        Self {
            folder,
            oracle,
            normalizer,
            client,
            candidates: RwLock::new(HashSet::new()),
            reconcile_lock: Mutex::new(()),
        }
    }

    /// The folder this synchronizer owns.
    pub fn folder(&self) -> &WorkspaceFolder {
        &self.folder
    }

    /// Where the reconciled compilation database is published.
    pub fn artifact_path(&self) -> PathBuf {
        self.folder.root.join(ARTIFACT_FILE_NAME)
    }

    /// Currently observed candidate sources, for diagnostics.
    pub async fn candidates(&self) -> Vec<PathBuf> {
        self.candidates.read().await.iter().cloned().collect()
    }

    /// A compilation database appeared below the folder root.
    pub async fn on_source_created(&self, path: &Path) -> Result<()> {
        self.candidates.write().await.insert(path.to_path_buf());
        debug!("candidate source added: {}", path.display());
        self.reconcile_if_active(path).await
    }

    /// A known compilation database changed on disk.
    pub async fn on_source_changed(&self, path: &Path) -> Result<()> {
        self.reconcile_if_active(path).await
    }

    /// A compilation database disappeared. Never triggers reconciliation.
    pub async fn on_source_deleted(&self, path: &Path) {
        if self.candidates.write().await.remove(path) {
            debug!("candidate source removed: {}", path.display());
        }
    }

    /// Reconcile only if the source sits in the active build directory.
    async fn reconcile_if_active(&self, path: &Path) -> Result<()> {
        let Some(active) = self.oracle.active_build_directory(&self.folder.root).await else {
            debug!(
                "no active build directory for {}, ignoring {}",
                self.folder.root.display(),
                path.display()
            );
            return Ok(());
        };

        let Some(build_dir) = path.parent() else {
            return Ok(());
        };

        if build_dir != active {
            debug!(
                "{} is outside the active build directory {}, ignoring",
                path.display(),
                active.display()
            );
            return Ok(());
        }

        self.run_synchronization(build_dir).await
    }

    /// Reconcile the published artifact against `build_dir`.
    ///
    /// Externally driven entry point: the caller asserts the build
    /// directory is the relevant one, so no active-directory check happens
    /// here. Normalizer failures abort the reconciliation without touching
    /// the artifact; malformed normalizer output is a defect and propagates.
    pub async fn run_synchronization(&self, build_dir: &Path) -> Result<()> {
        if !self.folder.is_local() {
            debug!(
                "folder {} uses scheme {}, synchronization is local-only",
                self.folder.root.display(),
                self.folder.scheme
            );
            return Ok(());
        }

        // At most one reconciliation in flight per folder.
        let _guard = self.reconcile_lock.lock().await;

        let text = match self.normalizer.normalize(build_dir).await {
            Ok(text) => text,
            Err(e) => {
                warn!(
                    "normalization failed for {}, keeping published database: {e}",
                    build_dir.display()
                );
                return Ok(());
            }
        };

        let fresh: serde_json::Value = serde_json::from_str(&text)?;

        let artifact = self.artifact_path();
        if let Ok(previous) = fs::read_to_string(&artifact).await {
            let unchanged = serde_json::from_str::<serde_json::Value>(&previous)
                .is_ok_and(|prev| prev == fresh);
            if unchanged {
                debug!(
                    "compilation database for {} unchanged, skipping write",
                    self.folder.root.display()
                );
                return Ok(());
            }
        }

        // Probed separately from the read above so the restart decision
        // reflects existence right before the write. The window between
        // probe and write stays open; low trigger rates make that tolerable.
        let existed = fs::try_exists(&artifact).await.unwrap_or(false);

        fs::write(&artifact, &text).await?;
        info!("published compilation database at {}", artifact.display());

        if !existed {
            if let Err(e) = self.client.restart().await {
                warn!("language server restart failed: {e}");
            }
        }

        Ok(())
    }
}
