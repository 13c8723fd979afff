use std::path::Path;

use log::debug;

use crate::collectors::inventory::{binary_available, shell_command, shell_quote, SourceInventory};
use crate::config::OpenshiftSettings;
use crate::constants::OPENSHIFT_WORKSPACE_LABEL;
use crate::models::{DiagnosticSource, WorkspaceKind};

/// Logs of workspaces running as OpenShift pods, fetched with `oc rsync`.
pub struct OpenshiftInventory {
    shell: String,
    binary: String,
    namespace: String,
    sources: Vec<DiagnosticSource>,
}

impl OpenshiftInventory {
    pub fn new(shell: &str, settings: &OpenshiftSettings) -> Self {
        Self {
            shell: shell.to_string(),
            binary: settings.binary.clone(),
            namespace: settings.namespace.clone(),
            sources: settings.sources.clone(),
        }
    }
}

impl SourceInventory for OpenshiftInventory {
    fn kind(&self) -> WorkspaceKind {
        WorkspaceKind::Openshift
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
        let oc = shell_quote(&self.binary);
        let namespace = shell_quote(&self.namespace);
        let selector = shell_quote(&format!("{}={}", OPENSHIFT_WORKSPACE_LABEL, workspace_id));
        let script = format!(
            "{oc} rsync -n {ns} \"$({oc} get pods -n {ns} -l {selector} -o jsonpath='{{.items[0].metadata.name}}')\":{remote} {dest}",
            oc = oc,
            ns = namespace,
            selector = selector,
            remote = shell_quote(remote_location),
            dest = shell_quote(&local_dest.to_string_lossy()),
        );
        shell_command(&self.shell, script)
    }
}
