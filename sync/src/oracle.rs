//! Active build directory lookup.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;

/// Reports the build directory currently active for a workspace folder.
///
/// The answer is maintained by the build-system integration and can change
/// with every build configuration, so callers must query it fresh before
/// acting and never cache it.
#[async_trait]
pub trait BuildDirectoryOracle: Send + Sync {
    /// The active build directory for `folder_root`, if one is configured.
    async fn active_build_directory(&self, folder_root: &Path) -> Option<PathBuf>;
}

/// Oracle backed by an in-memory map, for tests and simple hosts.
#[derive(Default)]
pub struct FixedOracle {
    active: RwLock<HashMap<PathBuf, PathBuf>>,
}

impl FixedOracle {
    /// Create an oracle with no active build directories.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or clear the active build directory for a folder.
    pub async fn set(&self, folder_root: impl Into<PathBuf>, build_dir: Option<PathBuf>) {
        let folder_root = folder_root.into();
        let mut active = self.active.write().await;
        match build_dir {
            Some(dir) => {
                active.insert(folder_root, dir);
            }
            None => {
                active.remove(&folder_root);
            }
        }
    }
}

#[async_trait]
impl BuildDirectoryOracle for FixedOracle {
    async fn active_build_directory(&self, folder_root: &Path) -> Option<PathBuf> {
        self.active.read().await.get(folder_root).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_set_and_clear() {
        let oracle = FixedOracle::new();
        assert_eq!(oracle.active_build_directory(Path::new("/proj")).await, None);

        oracle.set("/proj", Some(PathBuf::from("/proj/build"))).await;
        assert_eq!(
            oracle.active_build_directory(Path::new("/proj")).await,
            Some(PathBuf::from("/proj/build"))
        );

        oracle.set("/proj", None).await;
        assert_eq!(oracle.active_build_directory(Path::new("/proj")).await, None);
    }
}
