//! # Compilation-Database Synchronizer
//!
//! Keeps the compilation database (`compile_commands.json`) a language
//! server reads at each workspace-folder root in step with the database
//! produced in the folder's currently active CMake build directory.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                         SyncContext                              │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  BuildSystemBridge ──► WorkspaceCoordinator ──► FolderSynchronizer│
//! │         │                      │                       │          │
//! │         ▼                      ▼                       ▼          │
//! │  BuildSystemEvent       ArtifactWatcher      Normalizer / Oracle  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Artifact events and build-system reconfigurations both funnel into the
//! per-folder reconciliation: normalize the active build directory's
//! database through the external tool, compare structurally with what is
//! already published, rewrite on difference, and restart the language
//! server only when the artifact first appears.

pub mod bridge;
pub mod client;
pub mod config;
pub mod context;
pub mod coordinator;
pub mod error;
pub mod normalizer;
pub mod oracle;
pub mod synchronizer;
pub mod workspace;

pub use bridge::{ActiveProject, BuildSystemBridge, BuildSystemEvent};
pub use client::{LanguageClient, RecordingClient};
pub use config::SyncConfig;
pub use context::SyncContext;
pub use coordinator::WorkspaceCoordinator;
pub use error::{Result, SyncError};
pub use normalizer::{ExternalNormalizer, Normalizer, StaticNormalizer};
pub use oracle::{BuildDirectoryOracle, FixedOracle};
pub use synchronizer::FolderSynchronizer;
pub use workspace::{WorkspaceFolder, WorkspaceFoldersChange};
