//! External normalization of compilation databases.
//!
//! The normalization tool expands a build directory's compilation database
//! into its canonical per-translation-unit form. Its stdout is kept
//! verbatim: re-serializing the database here would introduce textual drift
//! between what the tool produced and what gets published.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::config::SyncConfig;
use crate::error::{Result, SyncError};

/// Produces normalized compilation-database text for a build directory.
#[async_trait]
pub trait Normalizer: Send + Sync {
    /// Normalize the compilation database found in `build_dir`.
    ///
    /// Returns the full database as UTF-8 JSON text, or an error when the
    /// tool is unavailable or reports failure.
    async fn normalize(&self, build_dir: &Path) -> Result<String>;
}

/// Normalizer that shells out to the configured external tool in list mode,
/// scoped to the build directory (`compdb -p <build_dir> list`).
pub struct ExternalNormalizer {
    /// Program name or path of the tool.
    program: String,

    /// Extra arguments inserted ahead of the list-mode invocation.
    extra_args: Vec<String>,
}

impl ExternalNormalizer {
    /// Create a normalizer from configuration.
    pub fn new(config: &SyncConfig) -> Self {
        Self {
            program: config.normalizer_program.clone(),
            extra_args: config.normalizer_args.clone(),
        }
    }
}

#[async_trait]
impl Normalizer for ExternalNormalizer {
    async fn normalize(&self, build_dir: &Path) -> Result<String> {
        debug!(
            "normalizing compilation database in {}",
            build_dir.display()
        );

        let output = Command::new(&self.program)
            .args(&self.extra_args)
            .arg("-p")
            .arg(build_dir)
            .arg("list")
            .output()
            .await
            .map_err(|e| SyncError::NormalizerUnavailable(format!("{}: {e}", self.program)))?;

        if !output.status.success() {
            return Err(SyncError::NormalizerFailed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Normalizer that returns fixed text and counts invocations.
///
/// A stand-in for the external tool in tests and dry runs.
pub struct StaticNormalizer {
    text: String,
    invocations: AtomicUsize,
}

impl StaticNormalizer {
    /// Create a normalizer that always returns `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            invocations: AtomicUsize::new(0),
        }
    }

    /// How many times `normalize` has been called.
    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Normalizer for StaticNormalizer {
    async fn normalize(&self, _build_dir: &Path) -> Result<String> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        Ok(self.text.clone())
    }
}
