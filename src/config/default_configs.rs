use crate::config::collection_config::{CollectorConfig, DockerSettings, OpenshiftSettings};
use crate::constants::{
    BOOTSTRAPPER_LOGS, DEFAULT_SHELL, DOCKER_BINARY, EXEC_AGENT_LOGS, OPENSHIFT_BINARY,
    OPENSHIFT_DEFAULT_NAMESPACE, PREPARING_WS_TIMEOUT_SECS, STATUS_QUERY_TIMEOUT_SECS,
    WS_AGENT_LOGS,
};
use crate::models::DiagnosticSource;

/// Logs every workspace agent writes, regardless of the backing environment.
pub fn default_workspace_sources() -> Vec<DiagnosticSource> {
    [BOOTSTRAPPER_LOGS, EXEC_AGENT_LOGS, WS_AGENT_LOGS]
        .iter()
        .map(|(name, location)| DiagnosticSource::new(*name, *location))
        .collect()
}

impl Default for CollectorConfig {
    fn default() -> Self {
        CollectorConfig {
            version: "1.0".into(),
            description: "Default workspace log collection configuration".into(),
            destination: None,
            preparation_timeout_secs: PREPARING_WS_TIMEOUT_SECS,
            shell: DEFAULT_SHELL.into(),
            status_command: None,
            status_timeout_secs: STATUS_QUERY_TIMEOUT_SECS,
            docker: DockerSettings {
                binary: DOCKER_BINARY.into(),
                sources: default_workspace_sources(),
            },
            openshift: OpenshiftSettings {
                binary: OPENSHIFT_BINARY.into(),
                namespace: OPENSHIFT_DEFAULT_NAMESPACE.into(),
                sources: default_workspace_sources(),
            },
            custom: None,
        }
    }
}
