//! # workspace-collector
//!
//! Best-effort collection of diagnostic logs from remote workspaces.
//!
//! ## Overview
//!
//! Given a workspace, the collector checks that the workspace is running,
//! enumerates the log locations known for its kind of environment, copies
//! each one into `<destination>/<workspace id>/<source name>` with an
//! external command, and removes directories that stayed empty. A failing
//! source never prevents the others from being collected, and collection
//! never fails the caller.
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use workspace_collector::collectors::engine::CollectionEngine;
//! use workspace_collector::collectors::status::StaticStatusProvider;
//! use workspace_collector::config::CollectorConfig;
//! use workspace_collector::models::{WorkspaceKind, WorkspaceStatus};
//! use workspace_collector::utils::process::ProcessRunner;
//! use workspace_collector::workspace::DeferredWorkspace;
//!
//! # async fn example() {
//! let (workspace, id_sender) = DeferredWorkspace::new("java-ws", WorkspaceKind::Openshift);
//! // ... once the workspace has been created
//! id_sender.resolve("workspacek2jh8vmg1ni4hl3v");
//!
//! let engine = CollectionEngine::from_config(
//!     WorkspaceKind::Openshift,
//!     &CollectorConfig::default(),
//!     Arc::new(StaticStatusProvider::new(WorkspaceStatus::Running)),
//!     Arc::new(ProcessRunner::new()),
//! );
//! let report = engine.collect(&workspace, Path::new("/tmp/workspace-logs")).await;
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`cli`]: Command-line interface definitions and argument parsing
//! - [`models`]: Statuses, sources, outcomes and reports
//! - [`workspace`]: Workspace handles and lazy ID resolution
//! - [`collectors`]: Collection engine, readiness gate, inventories, status providers
//! - [`config`]: YAML configuration and defaults
//! - [`utils`]: Process execution, artifact store, summaries
//! - [`security`]: Validation of names used as directories
//! - [`error`]: Collection error taxonomy
//! - [`constants`]: Application constants

/// Command-line interface definitions and argument parsing
pub mod cli;

/// Core data models and structures used throughout the application
pub mod models;

/// Workspace handles
pub mod workspace;

/// Log collection engine and its collaborators
pub mod collectors;

/// Utility functions for processes, artifact storage and reporting
pub mod utils;

/// Configuration management and default sources
pub mod config;

/// Application constants and configuration values
pub mod constants;

/// Security utilities for path validation
pub mod security;

/// Collection error taxonomy
pub mod error;

/// Test utilities and helpers
#[cfg(test)]
pub mod test_utils;
