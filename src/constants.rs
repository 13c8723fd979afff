//! Global constants for the workspace collector.
//!
//! This module centralizes all hardcoded values to improve maintainability
//! and make configuration changes easier.

// Timeout constants
/// Default time a single remote retrieval command may run (workspace preparation timeout)
pub const PREPARING_WS_TIMEOUT_SECS: u64 = 240;

/// Time allowed for a status query command
pub const STATUS_QUERY_TIMEOUT_SECS: u64 = 30;

// Output capture constants
/// Lines of process output kept for failure reporting
pub const MAX_CAPTURED_OUTPUT_LINES: usize = 200;

/// Capacity of the channel merging stdout and stderr lines
pub const OUTPUT_CHANNEL_CAPACITY: usize = 256;

/// Time allowed after exit to collect output still in flight
pub const OUTPUT_DRAIN_GRACE_MS: u64 = 100;

// Command construction
/// Shell used to run retrieval scripts
pub const DEFAULT_SHELL: &str = "bash";

pub const DOCKER_BINARY: &str = "docker";
pub const OPENSHIFT_BINARY: &str = "oc";

/// Pod label carrying the workspace ID on OpenShift
pub const OPENSHIFT_WORKSPACE_LABEL: &str = "che.workspace_id";

/// Default OpenShift project
pub const OPENSHIFT_DEFAULT_NAMESPACE: &str = "eclipse-che";

// Default diagnostic sources inside a workspace
pub const BOOTSTRAPPER_LOGS: (&str, &str) = ("bootstrapper", "/tmp/bootstrapper");
pub const EXEC_AGENT_LOGS: (&str, &str) = ("exec-agent", "/workspace_logs/exec-agent");
pub const WS_AGENT_LOGS: (&str, &str) = ("ws-agent", "/workspace_logs/ws-agent");

// Template placeholders
pub const PLACEHOLDER_WORKSPACE_ID: &str = "{workspace_id}";
pub const PLACEHOLDER_REMOTE: &str = "{remote}";
pub const PLACEHOLDER_DEST: &str = "{dest}";

// Default file names
pub const DEFAULT_OUTPUT_DIR: &str = "workspace-logs";
pub const DEFAULT_SUMMARY_NAME: &str = "collection_summary.json";
