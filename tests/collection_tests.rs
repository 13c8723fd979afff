//! Integration tests for the collection engine.
//!
//! Retrieval is simulated with an in-process runner that writes into the
//! destination directory, so these tests need no container tooling.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tempfile::TempDir;

use workspace_collector::collectors::engine::CollectionEngine;
use workspace_collector::collectors::inventory::SourceInventory;
use workspace_collector::collectors::status::StaticStatusProvider;
use workspace_collector::models::{
    AbortReason, DiagnosticSource, RunState, WorkspaceKind, WorkspaceStatus,
};
use workspace_collector::utils::process::{CommandRunner, ExecutionResult, OutputSink};
use workspace_collector::workspace::{DeferredWorkspace, ResolvedWorkspace};

struct ListedInventory {
    sources: Vec<DiagnosticSource>,
}

impl ListedInventory {
    fn new(sources: &[(&str, &str)]) -> Box<Self> {
        Box::new(Self {
            sources: sources
                .iter()
                .map(|(name, remote)| DiagnosticSource::new(*name, *remote))
                .collect(),
        })
    }
}

impl SourceInventory for ListedInventory {
    fn kind(&self) -> WorkspaceKind {
        WorkspaceKind::Docker
    }

    fn is_eligible(&self) -> bool {
        true
    }

    fn list_sources(&self) -> Vec<DiagnosticSource> {
        self.sources.clone()
    }

    fn build_command(&self, workspace_id: &str, local_dest: &Path, remote: &str) -> Vec<String> {
        vec![
            "copy".to_string(),
            workspace_id.to_string(),
            local_dest.to_string_lossy().to_string(),
            remote.to_string(),
        ]
    }
}

#[derive(Clone, Copy)]
enum Behavior {
    Write,
    Fail,
    Hang,
    /// Leaves a plain file where the artifact directory was, so pruning fails
    Clobber { succeed: bool },
}

/// Writes `payload` into the destination unless the remote is scripted otherwise.
struct SimulatedRunner {
    payload: Vec<u8>,
    scripted: Vec<(String, Behavior)>,
    calls: Mutex<Vec<String>>,
}

impl SimulatedRunner {
    fn writing(payload: &[u8]) -> Arc<Self> {
        Self::scripted(payload, &[])
    }

    fn scripted(payload: &[u8], scripted: &[(&str, Behavior)]) -> Arc<Self> {
        Arc::new(Self {
            payload: payload.to_vec(),
            scripted: scripted.iter().map(|(r, b)| (r.to_string(), *b)).collect(),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn behavior(&self, remote: &str) -> Behavior {
        self.scripted
            .iter()
            .find(|(r, _)| r == remote)
            .map(|(_, b)| *b)
            .unwrap_or(Behavior::Write)
    }
}

#[async_trait]
impl CommandRunner for SimulatedRunner {
    async fn run(
        &self,
        command_line: &[String],
        _timeout: Duration,
        sink: &mut dyn OutputSink,
    ) -> ExecutionResult {
        let dest = PathBuf::from(&command_line[2]);
        let remote = command_line[3].clone();
        self.calls.lock().unwrap().push(remote.clone());

        match self.behavior(&remote) {
            Behavior::Write => {
                fs::write(dest.join("output.log"), &self.payload).unwrap();
                ExecutionResult::success()
            }
            Behavior::Fail => {
                sink.accept_line(&format!("{}: no such file or directory", remote));
                ExecutionResult::exited(Some(1))
            }
            Behavior::Hang => ExecutionResult::timed_out(),
            Behavior::Clobber { succeed } => {
                fs::remove_dir(&dest).unwrap();
                fs::write(&dest, &self.payload).unwrap();
                if succeed {
                    ExecutionResult::success()
                } else {
                    ExecutionResult::exited(Some(2))
                }
            }
        }
    }
}

fn engine(inventory: Box<ListedInventory>, status: WorkspaceStatus, runner: Arc<SimulatedRunner>) -> CollectionEngine {
    CollectionEngine::new(
        inventory,
        Arc::new(StaticStatusProvider::new(status)),
        runner,
        Duration::from_secs(5),
    )
}

fn workspace(id: &str) -> ResolvedWorkspace {
    ResolvedWorkspace::new("java-ws", WorkspaceKind::Docker, id)
}

fn non_empty_dirs(root: &Path) -> Result<BTreeSet<PathBuf>> {
    let mut dirs = BTreeSet::new();
    if !root.exists() {
        return Ok(dirs);
    }
    for entry in fs::read_dir(root)? {
        let path = entry?.path();
        if path.is_dir() && fs::read_dir(&path)?.next().is_some() {
            dirs.insert(path.strip_prefix(root)?.to_path_buf());
        }
    }
    Ok(dirs)
}

#[tokio::test]
async fn test_server_logs_scenario() -> Result<()> {
    let destination = TempDir::new()?;
    let runner = SimulatedRunner::writing(&[b'x'; 120]);
    let engine = engine(
        ListedInventory::new(&[("server-logs", "/var/log/server")]),
        WorkspaceStatus::Running,
        runner.clone(),
    );

    let report = engine.collect(&workspace("W"), destination.path()).await;

    assert_eq!(report.state, RunState::Completed);
    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.outcomes[0].name, "server-logs");
    assert!(report.outcomes[0].succeeded);

    let dir = destination.path().join("W").join("server-logs");
    assert!(dir.is_dir());
    assert_eq!(fs::read(dir.join("output.log"))?.len(), 120);
    assert_eq!(report.outcomes[0].artifact_dir.as_deref(), Some(dir.as_path()));
    Ok(())
}

#[tokio::test]
async fn test_non_running_workspace_has_no_side_effects() -> Result<()> {
    for status in [
        WorkspaceStatus::Starting,
        WorkspaceStatus::Stopping,
        WorkspaceStatus::Stopped,
        WorkspaceStatus::Error,
    ] {
        let destination = TempDir::new()?;
        let runner = SimulatedRunner::writing(b"log line");
        let engine = engine(
            ListedInventory::new(&[("ws-agent", "/workspace_logs/ws-agent")]),
            status,
            runner.clone(),
        );

        let report = engine.collect(&workspace("W"), destination.path()).await;

        assert_eq!(report.state, RunState::Aborted(AbortReason::NotRunning(status)));
        assert!(report.outcomes.is_empty());
        assert_eq!(runner.call_count(), 0);
        assert_eq!(fs::read_dir(destination.path())?.count(), 0);
    }
    Ok(())
}

#[tokio::test]
async fn test_all_sources_succeed() -> Result<()> {
    let destination = TempDir::new()?;
    let sources = [
        ("bootstrapper", "/tmp/bootstrapper"),
        ("exec-agent", "/workspace_logs/exec-agent"),
        ("ws-agent", "/workspace_logs/ws-agent"),
    ];
    let runner = SimulatedRunner::writing(b"started");
    let engine = engine(ListedInventory::new(&sources), WorkspaceStatus::Running, runner.clone());

    let report = engine.collect(&workspace("W"), destination.path()).await;

    assert_eq!(report.succeeded_count(), sources.len());
    assert_eq!(runner.call_count(), sources.len());
    let dirs = non_empty_dirs(&destination.path().join("W"))?;
    assert_eq!(dirs.len(), sources.len());
    Ok(())
}

#[tokio::test]
async fn test_failing_source_is_isolated_and_pruned() -> Result<()> {
    let destination = TempDir::new()?;
    let runner = SimulatedRunner::scripted(b"data", &[("/logs/b", Behavior::Fail)]);
    let engine = engine(
        ListedInventory::new(&[("A", "/logs/a"), ("B", "/logs/b"), ("C", "/logs/c")]),
        WorkspaceStatus::Running,
        runner.clone(),
    );

    let report = engine.collect(&workspace("W"), destination.path()).await;

    let results: Vec<_> = report.outcomes.iter().map(|o| (o.name.as_str(), o.succeeded)).collect();
    assert_eq!(results, vec![("A", true), ("B", false), ("C", true)]);
    assert!(report.outcomes[1].diagnostic_text.contains("no such file or directory"));

    let root = destination.path().join("W");
    assert!(root.join("A").join("output.log").exists());
    assert!(!root.join("B").exists());
    assert!(root.join("C").join("output.log").exists());
    Ok(())
}

#[tokio::test]
async fn test_timed_out_source_is_pruned_and_run_continues() -> Result<()> {
    let destination = TempDir::new()?;
    let runner = SimulatedRunner::scripted(b"data", &[("/logs/slow", Behavior::Hang)]);
    let engine = engine(
        ListedInventory::new(&[("slow", "/logs/slow"), ("fast", "/logs/fast")]),
        WorkspaceStatus::Running,
        runner.clone(),
    );

    let report = engine.collect(&workspace("W"), destination.path()).await;

    assert!(!report.outcomes[0].succeeded);
    assert!(report.outcomes[0].timed_out);
    assert!(report.outcomes[0].artifact_dir.is_none());
    assert!(!destination.path().join("W").join("slow").exists());
    assert!(report.outcomes[1].succeeded);
    assert_eq!(runner.call_count(), 2);
    Ok(())
}

#[tokio::test]
async fn test_prune_failure_does_not_change_outcomes() -> Result<()> {
    let destination = TempDir::new()?;
    let runner = SimulatedRunner::scripted(
        b"data",
        &[
            ("/logs/a", Behavior::Clobber { succeed: true }),
            ("/logs/b", Behavior::Clobber { succeed: false }),
        ],
    );
    let engine = engine(
        ListedInventory::new(&[("A", "/logs/a"), ("B", "/logs/b"), ("C", "/logs/c")]),
        WorkspaceStatus::Running,
        runner.clone(),
    );

    let report = engine.collect(&workspace("W"), destination.path()).await;

    let results: Vec<_> = report.outcomes.iter().map(|o| (o.name.as_str(), o.succeeded)).collect();
    assert_eq!(results, vec![("A", true), ("B", false), ("C", true)]);
    assert!(report.outcomes[0].artifact_dir.is_none());
    assert!(report.outcomes[1].artifact_dir.is_none());
    assert_eq!(runner.call_count(), 3);

    let root = destination.path().join("W");
    assert!(root.join("A").is_file());
    assert!(root.join("C").join("output.log").exists());
    Ok(())
}

#[tokio::test]
async fn test_repeated_collection_is_idempotent() -> Result<()> {
    let destination = TempDir::new()?;
    let runner = SimulatedRunner::writing(b"same content");
    let engine = engine(
        ListedInventory::new(&[("exec-agent", "/workspace_logs/exec-agent"), ("ws-agent", "/workspace_logs/ws-agent")]),
        WorkspaceStatus::Running,
        runner.clone(),
    );

    engine.collect(&workspace("W"), destination.path()).await;
    let first = non_empty_dirs(&destination.path().join("W"))?;
    engine.collect(&workspace("W"), destination.path()).await;
    let second = non_empty_dirs(&destination.path().join("W"))?;

    assert_eq!(first, second);
    assert_eq!(fs::read_dir(destination.path())?.count(), 1);
    assert_eq!(
        fs::read_dir(destination.path().join("W").join("ws-agent"))?.count(),
        1
    );
    Ok(())
}

#[tokio::test]
async fn test_empty_inventory_completes_without_directories() -> Result<()> {
    let destination = TempDir::new()?;
    let runner = SimulatedRunner::writing(b"unused");
    let engine = engine(ListedInventory::new(&[]), WorkspaceStatus::Running, runner.clone());

    let report = engine.collect(&workspace("W"), destination.path()).await;

    assert_eq!(report.state, RunState::Completed);
    assert!(report.outcomes.is_empty());
    assert_eq!(runner.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_deferred_workspace_id() -> Result<()> {
    let destination = TempDir::new()?;
    let runner = SimulatedRunner::writing(b"late");
    let engine = engine(
        ListedInventory::new(&[("ws-agent", "/workspace_logs/ws-agent")]),
        WorkspaceStatus::Running,
        runner.clone(),
    );

    let (workspace, sender) = DeferredWorkspace::new("java-ws", WorkspaceKind::Docker);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        sender.resolve("workspace123");
    });

    let report = engine.collect(&workspace, destination.path()).await;

    assert_eq!(report.workspace_id.as_deref(), Some("workspace123"));
    assert!(destination.path().join("workspace123").join("ws-agent").is_dir());
    Ok(())
}

#[tokio::test]
async fn test_unresolved_workspace_id_aborts() -> Result<()> {
    let destination = TempDir::new()?;
    let runner = SimulatedRunner::writing(b"never");
    let engine = engine(
        ListedInventory::new(&[("ws-agent", "/workspace_logs/ws-agent")]),
        WorkspaceStatus::Running,
        runner.clone(),
    );

    let (workspace, sender) = DeferredWorkspace::new("java-ws", WorkspaceKind::Docker);
    sender.fail("workspace creation failed");

    let report = engine.collect(&workspace, destination.path()).await;

    assert!(matches!(report.state, RunState::Aborted(AbortReason::IdentityUnresolved(_))));
    assert_eq!(runner.call_count(), 0);
    assert_eq!(fs::read_dir(destination.path())?.count(), 0);
    Ok(())
}
