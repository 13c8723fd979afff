use std::path::PathBuf;

use thiserror::Error;

use crate::models::WorkspaceStatus;

/// Failures that can occur while collecting diagnostics from a workspace.
///
/// None of these ever escape [`CollectionEngine::collect`](crate::collectors::engine::CollectionEngine::collect);
/// they are turned into log lines and per-source outcomes.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("cannot resolve id of workspace {workspace}: {reason}")]
    IdentityResolution { workspace: String, reason: String },

    #[error("cannot query status of workspace {workspace_id}: {reason}")]
    StatusQuery { workspace_id: String, reason: String },

    #[error("workspace {workspace_id} has improper status {status}")]
    NotRunning {
        workspace_id: String,
        status: WorkspaceStatus,
    },

    #[error("retrieval of {source_name} failed: {reason}")]
    Retrieval { source_name: String, reason: String },

    #[error("cannot prepare artifact directory {}: {source}", path.display())]
    Store {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type CollectResult<T> = std::result::Result<T, CollectError>;
