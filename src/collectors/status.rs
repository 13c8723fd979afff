//! Sources of truth for a workspace's lifecycle status.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use log::debug;

use crate::collectors::inventory::shell_command;
use crate::collectors::inventory::custom::render_template;
use crate::constants::STATUS_QUERY_TIMEOUT_SECS;
use crate::models::WorkspaceStatus;
use crate::utils::process::{CommandRunner, LineBuffer};

/// Answers "what is the current status of workspace X?"
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkspaceStatusProvider: Send + Sync {
    async fn get_status(&self, workspace_id: &str) -> Result<WorkspaceStatus>;
}

/// Always reports the same status.
#[derive(Debug, Clone)]
pub struct StaticStatusProvider {
    status: WorkspaceStatus,
}

impl StaticStatusProvider {
    pub fn new(status: WorkspaceStatus) -> Self {
        Self { status }
    }
}

#[async_trait]
impl WorkspaceStatusProvider for StaticStatusProvider {
    async fn get_status(&self, _workspace_id: &str) -> Result<WorkspaceStatus> {
        Ok(self.status)
    }
}

/// Runs a status command and parses the last non-empty line it prints.
///
/// The template may reference `{workspace_id}`; e.g.
/// `chectl workspace:list | awk '$1 == {workspace_id} {print $NF}'`.
pub struct CommandStatusProvider {
    shell: String,
    template: String,
    runner: Arc<dyn CommandRunner>,
    timeout: Duration,
}

impl CommandStatusProvider {
    pub fn new(shell: &str, template: &str, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            shell: shell.to_string(),
            template: template.to_string(),
            runner,
            timeout: Duration::from_secs(STATUS_QUERY_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl WorkspaceStatusProvider for CommandStatusProvider {
    async fn get_status(&self, workspace_id: &str) -> Result<WorkspaceStatus> {
        let script = render_template(&self.template, workspace_id, std::path::Path::new(""), "");
        let command = shell_command(&self.shell, script);
        debug!("Querying status of workspace {} with {:?}", workspace_id, command);

        let mut output = LineBuffer::new();
        let result = self.runner.run(&command, self.timeout, &mut output).await;
        if !result.succeeded() {
            bail!(
                "status command {}: {}",
                result.describe(),
                output.text()
            );
        }

        let last_line = output
            .lines()
            .filter(|line| !line.trim().is_empty())
            .last()
            .ok_or_else(|| anyhow!("status command printed nothing"))?;

        last_line
            .parse()
            .context(format!("Unexpected status output {:?}", last_line))
    }
}
