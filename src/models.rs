use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state reported for a workspace.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkspaceStatus {
    Starting,
    Running,
    Stopping,
    Stopped,
    Error,
}

impl fmt::Display for WorkspaceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            WorkspaceStatus::Starting => "STARTING",
            WorkspaceStatus::Running => "RUNNING",
            WorkspaceStatus::Stopping => "STOPPING",
            WorkspaceStatus::Stopped => "STOPPED",
            WorkspaceStatus::Error => "ERROR",
        };
        write!(f, "{}", text)
    }
}

impl FromStr for WorkspaceStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "STARTING" => Ok(WorkspaceStatus::Starting),
            "RUNNING" => Ok(WorkspaceStatus::Running),
            "STOPPING" => Ok(WorkspaceStatus::Stopping),
            "STOPPED" => Ok(WorkspaceStatus::Stopped),
            "ERROR" => Ok(WorkspaceStatus::Error),
            other => Err(anyhow!("Unknown workspace status: {}", other)),
        }
    }
}

/// Kind of environment backing a workspace; selects the source inventory.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum WorkspaceKind {
    Docker,
    Openshift,
    Custom,
}

impl fmt::Display for WorkspaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkspaceKind::Docker => write!(f, "docker"),
            WorkspaceKind::Openshift => write!(f, "openshift"),
            WorkspaceKind::Custom => write!(f, "custom"),
        }
    }
}

impl FromStr for WorkspaceKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "docker" => Ok(WorkspaceKind::Docker),
            "openshift" => Ok(WorkspaceKind::Openshift),
            "custom" => Ok(WorkspaceKind::Custom),
            other => Err(anyhow!("Unknown workspace kind: {}", other)),
        }
    }
}

/// One named log location inside a workspace.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticSource {
    /// Unique within an inventory; also the sub-directory name
    pub name: String,
    /// Path inside the remote environment
    pub remote_location: String,
}

impl DiagnosticSource {
    pub fn new(name: impl Into<String>, remote_location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            remote_location: remote_location.into(),
        }
    }
}

/// Result of grabbing a single diagnostic source.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CollectionOutcome {
    pub name: String,
    pub remote_location: String,
    pub succeeded: bool,
    pub timed_out: bool,
    /// Captured process output, only meaningful on failure
    pub diagnostic_text: String,
    /// Directory holding the artifact, if it survived pruning
    pub artifact_dir: Option<PathBuf>,
    pub duration_ms: u64,
}

/// Why a collection run stopped before touching any source.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum AbortReason {
    Ineligible,
    KindMismatch {
        expected: WorkspaceKind,
        actual: WorkspaceKind,
    },
    IdentityUnresolved(String),
    NotRunning(WorkspaceStatus),
    StatusQueryFailed(String),
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortReason::Ineligible => write!(f, "logs cannot be grabbed in this environment"),
            AbortReason::KindMismatch { expected, actual } => {
                write!(f, "expected a {} workspace, got {}", expected, actual)
            }
            AbortReason::IdentityUnresolved(msg) => write!(f, "workspace id unresolved: {}", msg),
            AbortReason::NotRunning(status) => write!(f, "improper status {}", status),
            AbortReason::StatusQueryFailed(msg) => write!(f, "status query failed: {}", msg),
        }
    }
}

/// Terminal state of a collection run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Completed,
    Aborted(AbortReason),
}

/// Everything one `collect` call produced.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CollectionReport {
    pub workspace_name: String,
    pub workspace_id: Option<String>,
    pub state: RunState,
    pub outcomes: Vec<CollectionOutcome>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CollectionReport {
    pub fn is_aborted(&self) -> bool {
        matches!(self.state, RunState::Aborted(_))
    }

    pub fn succeeded_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.succeeded_count()
    }
}
