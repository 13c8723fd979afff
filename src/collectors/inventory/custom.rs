use std::path::Path;

use log::debug;

use crate::collectors::inventory::{binary_available, shell_command, shell_quote, SourceInventory};
use crate::config::CustomSettings;
use crate::constants::{PLACEHOLDER_DEST, PLACEHOLDER_REMOTE, PLACEHOLDER_WORKSPACE_ID};
use crate::models::{DiagnosticSource, WorkspaceKind};

/// Sources fetched with an operator-supplied shell template.
pub struct CustomInventory {
    shell: String,
    template: Option<String>,
    sources: Vec<DiagnosticSource>,
}

impl CustomInventory {
    pub fn new(shell: &str, settings: Option<&CustomSettings>) -> Self {
        Self {
            shell: shell.to_string(),
            template: settings.map(|s| s.template.clone()),
            sources: settings.map(|s| s.sources.clone()).unwrap_or_default(),
        }
    }
}

/// Fill `{workspace_id}`, `{remote}` and `{dest}` with shell-quoted values.
///
/// Substitution is single pass, so placeholder text inside a value is never expanded.
pub fn render_template(
    template: &str,
    workspace_id: &str,
    local_dest: &Path,
    remote_location: &str,
) -> String {
    let dest = local_dest.to_string_lossy();
    let substitutions = [
        (PLACEHOLDER_WORKSPACE_ID, workspace_id),
        (PLACEHOLDER_REMOTE, remote_location),
        (PLACEHOLDER_DEST, dest.as_ref()),
    ];

    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;
    'scan: while let Some(pos) = rest.find('{') {
        rendered.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        for (placeholder, value) in substitutions {
            if let Some(after) = tail.strip_prefix(placeholder) {
                rendered.push_str(&shell_quote(value));
                rest = after;
                continue 'scan;
            }
        }
        rendered.push('{');
        rest = &tail[1..];
    }
    rendered.push_str(rest);
    rendered
}

impl SourceInventory for CustomInventory {
    fn kind(&self) -> WorkspaceKind {
        WorkspaceKind::Custom
    }

    fn is_eligible(&self) -> bool {
        if self.template.is_none() {
            debug!("No custom retrieval template configured");
            return false;
        }
        binary_available(&self.shell)
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
        match &self.template {
            Some(template) => shell_command(
                &self.shell,
                render_template(template, workspace_id, local_dest, remote_location),
            ),
            None => Vec::new(),
        }
    }
}
