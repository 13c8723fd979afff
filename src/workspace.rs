//! Handles to the workspaces whose logs are collected.
//!
//! A workspace ID is not always known when the handle is created: a test
//! harness typically starts creating the workspace and only learns its ID
//! later. [`DeferredWorkspace`] models that with a one-shot channel.

use async_trait::async_trait;
use tokio::sync::{oneshot, Mutex, OnceCell};

use crate::error::{CollectError, CollectResult};
use crate::models::WorkspaceKind;

/// A workspace whose diagnostics can be collected.
#[async_trait]
pub trait Workspace: Send + Sync {
    /// Human readable name, used in logs before the ID is known
    fn name(&self) -> &str;

    fn kind(&self) -> WorkspaceKind;

    /// Resolve the unique workspace ID. May wait for it to become available.
    async fn id(&self) -> CollectResult<String>;
}

/// Workspace with an ID known up front.
#[derive(Debug, Clone)]
pub struct ResolvedWorkspace {
    name: String,
    kind: WorkspaceKind,
    id: String,
}

impl ResolvedWorkspace {
    pub fn new(name: impl Into<String>, kind: WorkspaceKind, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            id: id.into(),
        }
    }
}

#[async_trait]
impl Workspace for ResolvedWorkspace {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> WorkspaceKind {
        self.kind
    }

    async fn id(&self) -> CollectResult<String> {
        Ok(self.id.clone())
    }
}

/// Sending half handed to whoever creates the workspace.
#[derive(Debug)]
pub struct WorkspaceIdSender(oneshot::Sender<Result<String, String>>);

impl WorkspaceIdSender {
    /// Publish the ID. Returns false if the workspace handle is gone.
    pub fn resolve(self, id: impl Into<String>) -> bool {
        self.0.send(Ok(id.into())).is_ok()
    }

    /// Report that the workspace could not be created.
    pub fn fail(self, reason: impl Into<String>) -> bool {
        self.0.send(Err(reason.into())).is_ok()
    }
}

/// Workspace whose ID is delivered later through a [`WorkspaceIdSender`].
///
/// The first successful resolution is memoized. Dropping the sender without
/// resolving counts as an interrupted resolution.
#[derive(Debug)]
pub struct DeferredWorkspace {
    name: String,
    kind: WorkspaceKind,
    id: OnceCell<String>,
    pending: Mutex<Option<oneshot::Receiver<Result<String, String>>>>,
}

impl DeferredWorkspace {
    pub fn new(name: impl Into<String>, kind: WorkspaceKind) -> (Self, WorkspaceIdSender) {
        let (tx, rx) = oneshot::channel();
        let workspace = Self {
            name: name.into(),
            kind,
            id: OnceCell::new(),
            pending: Mutex::new(Some(rx)),
        };
        (workspace, WorkspaceIdSender(tx))
    }

    fn failure(&self, reason: impl Into<String>) -> CollectError {
        CollectError::IdentityResolution {
            workspace: self.name.clone(),
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl Workspace for DeferredWorkspace {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> WorkspaceKind {
        self.kind
    }

    async fn id(&self) -> CollectResult<String> {
        let id = self
            .id
            .get_or_try_init(|| async {
                let receiver = self
                    .pending
                    .lock()
                    .await
                    .take()
                    .ok_or_else(|| self.failure("an earlier resolution attempt failed"))?;

                match receiver.await {
                    Ok(Ok(id)) => Ok::<_, CollectError>(id),
                    Ok(Err(reason)) => Err(self.failure(reason)),
                    Err(_) => Err(self.failure("resolution was interrupted")),
                }
            })
            .await?;
        Ok(id.clone())
    }
}
