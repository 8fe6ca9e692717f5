//! Application context tying the synchronizer together.
//!
//! The host extension constructs one [`SyncContext`] at activation and
//! tears it down at deactivation. All collaborators are passed in
//! explicitly; there is no process-wide state.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::bridge::{BuildSystemBridge, BuildSystemEvent};
use crate::client::LanguageClient;
use crate::config::SyncConfig;
use crate::coordinator::WorkspaceCoordinator;
use crate::normalizer::{ExternalNormalizer, Normalizer};
use crate::oracle::BuildDirectoryOracle;
use crate::workspace::{WorkspaceFolder, WorkspaceFoldersChange};

/// Live synchronizer state for one host session.
pub struct SyncContext {
    coordinator: Arc<WorkspaceCoordinator>,
    bridge: Arc<BuildSystemBridge>,
    bridge_task: JoinHandle<()>,
}

impl SyncContext {
    /// Bring the synchronizer up for the initially open workspace folders.
    ///
    /// `build_events` is the stream of build-system signals; the bridge
    /// consumes it on a background task until the sender side closes.
    pub async fn activate(
        config: SyncConfig,
        folders: Vec<WorkspaceFolder>,
        oracle: Arc<dyn BuildDirectoryOracle>,
        client: Arc<dyn LanguageClient>,
        build_events: mpsc::Receiver<BuildSystemEvent>,
    ) -> Result<Self> {
        let normalizer: Arc<dyn Normalizer> = Arc::new(ExternalNormalizer::new(&config));
        let coordinator = Arc::new(WorkspaceCoordinator::new(oracle, normalizer, client));

        for folder in folders {
            let root = folder.root.clone();
            if let Err(e) = coordinator.add_folder(folder).await {
                warn!("skipping workspace folder {}: {e}", root.display());
            }
        }

        let bridge = Arc::new(BuildSystemBridge::new(coordinator.clone()));
        let bridge_task = tokio::spawn(bridge.clone().run(build_events));

        info!("compilation-database synchronizer activated");
        Ok(Self {
            coordinator,
            bridge,
            bridge_task,
        })
    }

    /// The workspace coordinator.
    pub fn coordinator(&self) -> &Arc<WorkspaceCoordinator> {
        &self.coordinator
    }

    /// The build-system bridge.
    pub fn bridge(&self) -> &Arc<BuildSystemBridge> {
        &self.bridge
    }

    /// Forward a folder membership change from the host.
    pub async fn folders_changed(&self, change: &WorkspaceFoldersChange) {
        self.coordinator.folders_changed(change).await;
    }

    /// Tear everything down.
    ///
    /// Watchers are dropped and the bridge task is stopped. In-flight
    /// reconciliations are not cancelled and may still write.
    pub async fn deactivate(self) {
        for root in self.coordinator.folder_roots().await {
            let _ = self.coordinator.remove_folder(&root).await;
        }

        self.bridge_task.abort();
        info!("compilation-database synchronizer deactivated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::RecordingClient;
    use crate::oracle::FixedOracle;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_activate_and_deactivate() {
        let temp = TempDir::new().unwrap();
        let (_tx, rx) = mpsc::channel(8);

        let context = SyncContext::activate(
            SyncConfig::default(),
            vec![WorkspaceFolder::local("proj", temp.path())],
            Arc::new(FixedOracle::new()),
            Arc::new(RecordingClient::new()),
            rx,
        )
        .await
        .unwrap();

        assert_eq!(context.coordinator().folder_roots().await.len(), 1);

        context.deactivate().await;
    }

    #[tokio::test]
    async fn test_activate_skips_missing_folders() {
        let (_tx, rx) = mpsc::channel(8);

        let context = SyncContext::activate(
            SyncConfig::default(),
            vec![WorkspaceFolder::local("gone", "/nonexistent/path/12345")],
            Arc::new(FixedOracle::new()),
            Arc::new(RecordingClient::new()),
            rx,
        )
        .await
        .unwrap();

        assert!(context.coordinator().folder_roots().await.is_empty());
        context.deactivate().await;
    }
}
