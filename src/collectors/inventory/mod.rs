pub mod custom;
pub mod docker;
pub mod openshift;

use std::path::Path;

use log::info;

use crate::config::CollectorConfig;
use crate::models::{DiagnosticSource, WorkspaceKind};

/// The diagnostic sources of one kind of workspace and how to fetch them.
pub trait SourceInventory: Send + Sync {
    fn kind(&self) -> WorkspaceKind;

    /// Whether logs can be grabbed at all from this environment (tools present, etc.)
    fn is_eligible(&self) -> bool;

    /// Ordered, deterministic list of sources. Empty is valid.
    fn list_sources(&self) -> Vec<DiagnosticSource>;

    /// Command line copying `remote_location` of the workspace into `local_dest`.
    fn build_command(
        &self,
        workspace_id: &str,
        local_dest: &Path,
        remote_location: &str,
    ) -> Vec<String>;
}

/// Get the inventory matching a workspace kind
pub fn inventory_for(kind: WorkspaceKind, config: &CollectorConfig) -> Box<dyn SourceInventory> {
    match kind {
        WorkspaceKind::Docker => {
            info!("Using docker log inventory");
            Box::new(docker::DockerInventory::new(&config.shell, &config.docker))
        }
        WorkspaceKind::Openshift => {
            info!("Using openshift log inventory");
            Box::new(openshift::OpenshiftInventory::new(&config.shell, &config.openshift))
        }
        WorkspaceKind::Custom => {
            info!("Using custom log inventory");
            Box::new(custom::CustomInventory::new(&config.shell, config.custom.as_ref()))
        }
    }
}

/// Quote a value for safe interpolation into a POSIX shell script.
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Wrap a script as `<shell> -c <script>`.
pub(crate) fn shell_command(shell: &str, script: String) -> Vec<String> {
    vec![shell.to_string(), "-c".to_string(), script]
}

pub(crate) fn binary_available(binary: &str) -> bool {
    which::which(binary).is_ok()
}
