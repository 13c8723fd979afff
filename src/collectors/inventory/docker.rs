use std::path::Path;

use log::debug;

use crate::collectors::inventory::{binary_available, shell_command, shell_quote, SourceInventory};
use crate::config::DockerSettings;
use crate::models::{DiagnosticSource, WorkspaceKind};

/// Logs of workspaces running as local docker containers.
///
/// The container is looked up by name filter on the workspace ID and the
/// logs are copied out with `docker cp`.
pub struct DockerInventory {
    shell: String,
    binary: String,
    sources: Vec<DiagnosticSource>,
}

impl DockerInventory {
    pub fn new(shell: &str, settings: &DockerSettings) -> Self {
        Self {
            shell: shell.to_string(),
            binary: settings.binary.clone(),
            sources: settings.sources.clone(),
        }
    }
}

impl SourceInventory for DockerInventory {
    fn kind(&self) -> WorkspaceKind {
        WorkspaceKind::Docker
    }

    fn is_eligible(&self) -> bool {
        let available = binary_available(&self.binary);
        if !available {
            debug!("{} not found on PATH", self.binary);
        }
        available
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
        let docker = shell_quote(&self.binary);
        let script = format!(
            "{docker} cp \"$({docker} ps -q --filter name={id})\":{remote} {dest}",
            docker = docker,
            id = shell_quote(workspace_id),
            remote = shell_quote(remote_location),
            dest = shell_quote(&local_dest.to_string_lossy()),
        );
        shell_command(&self.shell, script)
    }
}
