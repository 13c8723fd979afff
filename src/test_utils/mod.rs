//! Test utilities for the workspace collector
//!
//! Fakes for the inventory and the command runner so the engine can be
//! exercised without docker or a cluster.

#![cfg(test)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::collectors::inventory::SourceInventory;
use crate::models::{DiagnosticSource, WorkspaceKind};
use crate::utils::process::{CommandRunner, ExecutionResult, OutputSink};

/// Name of the file [`RecordingRunner`] writes into an artifact directory
pub const FAKE_ARTIFACT_NAME: &str = "fake.log";

/// Inventory whose commands are `["fake-copy", <id>, <dest>, <remote>]`.
pub struct FakeInventory {
    sources: Vec<DiagnosticSource>,
    eligible: bool,
}

impl FakeInventory {
    pub fn with_sources(sources: &[(&str, &str)]) -> Self {
        Self {
            sources: sources
                .iter()
                .map(|(name, remote)| DiagnosticSource::new(*name, *remote))
                .collect(),
            eligible: true,
        }
    }

    pub fn ineligible(mut self) -> Self {
        self.eligible = false;
        self
    }
}

impl SourceInventory for FakeInventory {
    fn kind(&self) -> WorkspaceKind {
        WorkspaceKind::Custom
    }

    fn is_eligible(&self) -> bool {
        self.eligible
    }

    fn list_sources(&self) -> Vec<DiagnosticSource> {
        self.sources.clone()
    }

    fn build_command(
        &self,
        workspace_id: &str,
        local_dest: &Path,
        remote_location: &str,
    ) -> Vec<String> {
        vec![
            "fake-copy".to_string(),
            workspace_id.to_string(),
            local_dest.to_string_lossy().to_string(),
            remote_location.to_string(),
        ]
    }
}

/// Runner that "copies" by writing fixed bytes into the destination,
/// failing for selected remote locations.
pub struct RecordingRunner {
    payload: Vec<u8>,
    failing_remotes: Vec<String>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl RecordingRunner {
    pub fn writing(payload: Vec<u8>) -> Self {
        Self {
            payload,
            failing_remotes: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_for(remotes: &[&str], payload: Vec<u8>) -> Self {
        Self {
            failing_remotes: remotes.iter().map(|r| r.to_string()).collect(),
            ..Self::writing(payload)
        }
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(
        &self,
        command_line: &[String],
        _timeout: Duration,
        sink: &mut dyn OutputSink,
    ) -> ExecutionResult {
        self.calls.lock().unwrap().push(command_line.to_vec());

        let dest = PathBuf::from(&command_line[2]);
        let remote = &command_line[3];
        if self.failing_remotes.iter().any(|r| r == remote) {
            sink.accept_line(&format!("simulated failure for {}", remote));
            return ExecutionResult::exited(Some(1));
        }

        if !self.payload.is_empty() {
            fs::write(dest.join(FAKE_ARTIFACT_NAME), &self.payload).unwrap();
        }
        ExecutionResult::success()
    }
}
