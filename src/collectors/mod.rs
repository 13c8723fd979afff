//! Workspace log collection.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          CollectionEngine               │
//! ├─────────────────────────────────────────┤
//! │  Inventory check │ ReadinessGate        │
//! │                  │  (id + status query) │
//! ├─────────────────────────────────────────┤
//! │        Source inventories               │
//! │  ┌─────────┬───────────┬──────────┐     │
//! │  │ Docker  │ Openshift │  Custom  │     │
//! │  └─────────┴───────────┴──────────┘     │
//! ├─────────────────────────────────────────┤
//! │   CommandRunner   │   ArtifactStore     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use workspace_collector::collectors::engine::CollectionEngine;
//! use workspace_collector::collectors::status::StaticStatusProvider;
//! use workspace_collector::config::CollectorConfig;
//! use workspace_collector::models::{WorkspaceKind, WorkspaceStatus};
//! use workspace_collector::utils::process::ProcessRunner;
//! use workspace_collector::workspace::ResolvedWorkspace;
//!
//! # async fn example() {
//! let config = CollectorConfig::default();
//! let engine = CollectionEngine::from_config(
//!     WorkspaceKind::Docker,
//!     &config,
//!     Arc::new(StaticStatusProvider::new(WorkspaceStatus::Running)),
//!     Arc::new(ProcessRunner::new()),
//! );
//!
//! let workspace = ResolvedWorkspace::new("java-ws", WorkspaceKind::Docker, "workspace123");
//! let report = engine.collect(&workspace, Path::new("/tmp/workspace-logs")).await;
//! println!("{} source(s) grabbed", report.succeeded_count());
//! # }
//! ```

/// Orchestration of one collection run
pub mod engine;

/// Per-kind lists of diagnostic sources and retrieval commands
pub mod inventory;

/// Workspace id resolution and status precondition
pub mod readiness;

/// Workspace status providers
pub mod status;
