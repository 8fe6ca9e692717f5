//! Adapter between the build-system integration and the coordinator.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, mpsc};
use tracing::{debug, error, info};

use crate::coordinator::WorkspaceCoordinator;
use crate::error::Result;

/// The build-system integration's currently selected project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveProject {
    /// Project name reported by the integration.
    pub name: String,

    /// Workspace folder root the project belongs to.
    pub folder_root: PathBuf,

    /// Resolved binary (build output) directory.
    pub binary_dir: PathBuf,
}

/// Signals delivered by the build-system integration, validated into typed
/// payloads at the boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BuildSystemEvent {
    /// The selected project changed; `None` means no project is selected.
    ActiveProjectChanged { project: Option<ActiveProject> },

    /// The active project finished (re)configuring its build directory.
    Reconfigured,
}

/// Forwards build-system project and reconfiguration signals to the
/// [`WorkspaceCoordinator`].
///
/// Two states: idle (no active project) and bound to a project.
/// Reconfiguration signals only mean something while bound; binding to a
/// new project re-targets subsequent reconfigurations at that project.
pub struct BuildSystemBridge {
    coordinator: Arc<WorkspaceCoordinator>,
    active: RwLock<Option<ActiveProject>>,
}

impl BuildSystemBridge {
    /// Create a bridge in the idle state.
    pub fn new(coordinator: Arc<WorkspaceCoordinator>) -> Self {
        Self {
            coordinator,
            active: RwLock::new(None),
        }
    }

    /// The currently bound project, if any.
    pub async fn active_project(&self) -> Option<ActiveProject> {
        self.active.read().await.clone()
    }

    /// Process one build-system signal.
    pub async fn handle_event(&self, event: BuildSystemEvent) -> Result<()> {
        match event {
            BuildSystemEvent::ActiveProjectChanged { project } => {
                match &project {
                    Some(p) => info!("bound to active project {}", p.name),
                    None => info!("no active project"),
                }
                *self.active.write().await = project;
                Ok(())
            }
            BuildSystemEvent::Reconfigured => {
                let Some(project) = self.active.read().await.clone() else {
                    debug!("reconfigured with no active project, ignoring");
                    return Ok(());
                };

                debug!(
                    "project {} reconfigured, synchronizing {}",
                    project.name,
                    project.folder_root.display()
                );
                self.coordinator
                    .run_synchronization(&project.folder_root, &project.binary_dir)
                    .await
            }
        }
    }

    /// Drive the bridge from an event stream until the sender closes.
    pub async fn run(self: Arc<Self>, mut events: mpsc::Receiver<BuildSystemEvent>) {
        while let Some(event) = events.recv().await {
            if let Err(e) = self.handle_event(event).await {
                error!("build-system signal handling failed: {e}");
            }
        }

        debug!("build-system event stream closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use crate::client::RecordingClient;
    use crate::normalizer::StaticNormalizer;
    use crate::oracle::FixedOracle;
    use crate::workspace::WorkspaceFolder;

    const DATABASE: &str = r#"[{"directory":"/proj","command":"cc -c a.c","file":"a.c"}]"#;

    struct Fixture {
        _temp: TempDir,
        root: PathBuf,
        build_dir: PathBuf,
        normalizer: Arc<StaticNormalizer>,
        bridge: BuildSystemBridge,
    }

    async fn fixture() -> Fixture {
        let temp = TempDir::new().unwrap();
        let root = temp.path().to_path_buf();
        let build_dir = root.join("build");
        std::fs::create_dir(&build_dir).unwrap();

        let normalizer = Arc::new(StaticNormalizer::new(DATABASE));
        let coordinator = Arc::new(WorkspaceCoordinator::new(
            Arc::new(FixedOracle::new()),
            normalizer.clone(),
            Arc::new(RecordingClient::new()),
        ));
        coordinator
            .add_folder(WorkspaceFolder::local("proj", &root))
            .await
            .unwrap();

        Fixture {
            _temp: temp,
            root,
            build_dir,
            normalizer,
            bridge: BuildSystemBridge::new(coordinator),
        }
    }

    fn project(f: &Fixture) -> ActiveProject {
        ActiveProject {
            name: "proj".to_string(),
            folder_root: f.root.clone(),
            binary_dir: f.build_dir.clone(),
        }
    }

    #[tokio::test]
    async fn test_reconfigured_while_idle_is_ignored() {
        let f = fixture().await;

        f.bridge.handle_event(BuildSystemEvent::Reconfigured).await.unwrap();

        assert_eq!(f.normalizer.invocations(), 0);
    }

    #[tokio::test]
    async fn test_reconfigured_while_bound_synchronizes() {
        let f = fixture().await;

        f.bridge
            .handle_event(BuildSystemEvent::ActiveProjectChanged {
                project: Some(project(&f)),
            })
            .await
            .unwrap();
        f.bridge.handle_event(BuildSystemEvent::Reconfigured).await.unwrap();

        assert_eq!(f.normalizer.invocations(), 1);
        assert!(f.root.join("compile_commands.json").exists());
    }

    #[tokio::test]
    async fn test_unbinding_stops_synchronization() {
        let f = fixture().await;

        f.bridge
            .handle_event(BuildSystemEvent::ActiveProjectChanged {
                project: Some(project(&f)),
            })
            .await
            .unwrap();
        f.bridge
            .handle_event(BuildSystemEvent::ActiveProjectChanged { project: None })
            .await
            .unwrap();
        f.bridge.handle_event(BuildSystemEvent::Reconfigured).await.unwrap();

        assert_eq!(f.bridge.active_project().await, None);
        assert_eq!(f.normalizer.invocations(), 0);
    }
}
