//! Precondition check run before any log is grabbed.

use std::sync::Arc;

use log::debug;

use crate::collectors::status::WorkspaceStatusProvider;
use crate::error::CollectError;
use crate::models::WorkspaceStatus;
use crate::security::validate_path_component;
use crate::workspace::Workspace;

/// Answer of a readiness check.
#[derive(Debug)]
pub enum Readiness {
    Ready { workspace_id: String },
    NotReady(CollectError),
    QueryFailed(CollectError),
}

/// Decides whether a workspace is in a state that allows collection.
///
/// Resolves the workspace ID, then performs a single status query. Only
/// `RUNNING` is ready; the status may change right after the check.
pub struct ReadinessGate {
    status_provider: Arc<dyn WorkspaceStatusProvider>,
}

impl ReadinessGate {
    pub fn new(status_provider: Arc<dyn WorkspaceStatusProvider>) -> Self {
        Self { status_provider }
    }

    pub async fn check(&self, workspace: &dyn Workspace) -> Readiness {
        let workspace_id = match workspace.id().await {
            Ok(id) => id,
            Err(e) => return Readiness::QueryFailed(e),
        };

        // the id becomes a directory name
        if let Err(e) = validate_path_component("workspace id", &workspace_id) {
            return Readiness::QueryFailed(CollectError::IdentityResolution {
                workspace: workspace.name().to_string(),
                reason: e.to_string(),
            });
        }

        match self.status_provider.get_status(&workspace_id).await {
            Ok(WorkspaceStatus::Running) => {
                debug!("Workspace {} is running", workspace_id);
                Readiness::Ready { workspace_id }
            }
            Ok(status) => Readiness::NotReady(CollectError::NotRunning {
                workspace_id,
                status,
            }),
            Err(e) => Readiness::QueryFailed(CollectError::StatusQuery {
                workspace_id,
                reason: format!("{:#}", e),
            }),
        }
    }
}
