//! Language-server restart signal.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::Result;

/// Handle on the language server consuming the published artifact.
///
/// The server picks up in-place changes to an existing compilation database
/// on its own; a restart is only needed when the database first appears.
#[async_trait]
pub trait LanguageClient: Send + Sync {
    /// Ask the language server to restart.
    async fn restart(&self) -> Result<()>;
}

/// Client that only records restart requests, for tests and dry runs.
#[derive(Default)]
pub struct RecordingClient {
    restarts: AtomicUsize,
}

impl RecordingClient {
    /// Create a recording client.
    pub fn new() -> Self {
        Self::default()
    }

    /// How many restarts have been requested.
    pub fn restart_count(&self) -> usize {
        self.restarts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LanguageClient for RecordingClient {
    async fn restart(&self) -> Result<()> {
        self.restarts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
