//! Per-workspace collection run, from readiness check to pruned artifacts.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use log::{debug, info, warn};

use crate::collectors::inventory::{inventory_for, SourceInventory};
use crate::collectors::readiness::{Readiness, ReadinessGate};
use crate::collectors::status::WorkspaceStatusProvider;
use crate::config::CollectorConfig;
use crate::error::CollectError;
use crate::models::{
    AbortReason, CollectionOutcome, CollectionReport, DiagnosticSource, RunState, WorkspaceKind,
};
use crate::utils::process::{CommandRunner, LineBuffer};
use crate::utils::store::ArtifactStore;
use crate::workspace::Workspace;

/// Grabs every diagnostic source of a workspace into a local directory tree.
///
/// Sources are fetched one at a time. A failing source never stops the
/// others, and `collect` never returns an error: aborts and failures end up
/// in the [`CollectionReport`] and in `warn!` log lines.
pub struct CollectionEngine {
    gate: ReadinessGate,
    inventory: Box<dyn SourceInventory>,
    runner: Arc<dyn CommandRunner>,
    store: ArtifactStore,
    timeout: Duration,
}

impl CollectionEngine {
    pub fn new(
        inventory: Box<dyn SourceInventory>,
        status_provider: Arc<dyn WorkspaceStatusProvider>,
        runner: Arc<dyn CommandRunner>,
        timeout: Duration,
    ) -> Self {
        Self {
            gate: ReadinessGate::new(status_provider),
            inventory,
            runner,
            store: ArtifactStore::new(),
            timeout,
        }
    }

    /// Engine with the inventory configured for `kind`.
    pub fn from_config(
        kind: WorkspaceKind,
        config: &CollectorConfig,
        status_provider: Arc<dyn WorkspaceStatusProvider>,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self::new(
            inventory_for(kind, config),
            status_provider,
            runner,
            config.preparation_timeout(),
        )
    }

    /// Collect logs of `workspace` under `destination/<workspace id>/<source name>`.
    pub async fn collect(&self, workspace: &dyn Workspace, destination: &Path) -> CollectionReport {
        let started_at = Utc::now();
        let mut report = CollectionReport {
            workspace_name: workspace.name().to_string(),
            workspace_id: None,
            state: RunState::Completed,
            outcomes: Vec::new(),
            started_at,
            finished_at: started_at,
        };

        if workspace.kind() != self.inventory.kind() {
            warn!(
                "Workspace {} is a {} workspace but the collector handles {} workspaces",
                workspace.name(),
                workspace.kind(),
                self.inventory.kind()
            );
            return finish(report, RunState::Aborted(AbortReason::KindMismatch {
                expected: self.inventory.kind(),
                actual: workspace.kind(),
            }));
        }

        if !self.inventory.is_eligible() {
            info!(
                "Logs of {} workspaces cannot be grabbed here, skipping {}",
                self.inventory.kind(),
                workspace.name()
            );
            return finish(report, RunState::Aborted(AbortReason::Ineligible));
        }

        let workspace_id = match self.gate.check(workspace).await {
            Readiness::Ready { workspace_id } => workspace_id,
            Readiness::NotReady(e) | Readiness::QueryFailed(e) => {
                let reason = abort_reason(&e);
                warn!(
                    "It's impossible to get logs of workspace {}: {}",
                    workspace.name(),
                    e
                );
                return finish(report, RunState::Aborted(reason));
            }
        };
        report.workspace_id = Some(workspace_id.clone());

        let sources = self.inventory.list_sources();
        info!(
            "Grabbing {} log source(s) of workspace {} into {}",
            sources.len(),
            workspace_id,
            destination.display()
        );

        for source in &sources {
            let outcome = self.grab(&workspace_id, source, destination).await;
            report.outcomes.push(outcome);
        }

        let failed = report.failed_count();
        if failed > 0 {
            warn!(
                "{} of {} log source(s) of workspace {} could not be grabbed",
                failed,
                sources.len(),
                workspace_id
            );
        }

        finish(report, RunState::Completed)
    }

    /// Fetch one source. The artifact directory is pruned on every exit path.
    async fn grab(
        &self,
        workspace_id: &str,
        source: &DiagnosticSource,
        destination: &Path,
    ) -> CollectionOutcome {
        let started = Instant::now();
        let path = self
            .store
            .artifact_path(destination, workspace_id, &source.name);

        let mut outcome = CollectionOutcome {
            name: source.name.clone(),
            remote_location: source.remote_location.clone(),
            succeeded: false,
            timed_out: false,
            diagnostic_text: String::new(),
            artifact_dir: None,
            duration_ms: 0,
        };

        let dir = match self.store.acquire(path) {
            Ok(dir) => dir,
            Err(e) => {
                warn!(
                    "Can't obtain {} logs from workspace with id={}: {}",
                    source.name, workspace_id, e
                );
                outcome.diagnostic_text = e.to_string();
                outcome.duration_ms = elapsed_ms(started);
                return outcome;
            }
        };

        let command = self
            .inventory
            .build_command(workspace_id, dir.path(), &source.remote_location);
        debug!("Grabbing {} with {:?}", source.name, command);

        let mut output = LineBuffer::new();
        let result = self.runner.run(&command, self.timeout, &mut output).await;

        outcome.succeeded = result.succeeded();
        outcome.timed_out = result.timed_out;
        outcome.diagnostic_text = output.text();

        if outcome.succeeded {
            debug!("Grabbed {} logs of workspace {}", source.name, workspace_id);
        } else {
            let error = CollectError::Retrieval {
                source_name: source.name.clone(),
                reason: result.describe(),
            };
            warn!(
                "Can't obtain {} logs from workspace with id={} from directory {}. {} Output: {}",
                source.name, workspace_id, source.remote_location, error, outcome.diagnostic_text
            );
        }

        outcome.artifact_dir = dir.release();
        outcome.duration_ms = elapsed_ms(started);
        outcome
    }
}

fn abort_reason(error: &CollectError) -> AbortReason {
    match error {
        CollectError::NotRunning { status, .. } => AbortReason::NotRunning(*status),
        CollectError::IdentityResolution { reason, .. } => {
            AbortReason::IdentityUnresolved(reason.clone())
        }
        other => AbortReason::StatusQueryFailed(other.to_string()),
    }
}

fn finish(mut report: CollectionReport, state: RunState) -> CollectionReport {
    report.state = state;
    report.finished_at = Utc::now();
    report
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
