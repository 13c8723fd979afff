use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::env_vars::expand_env_vars;
use crate::constants::{
    DEFAULT_OUTPUT_DIR, DEFAULT_SHELL, PLACEHOLDER_DEST, PLACEHOLDER_WORKSPACE_ID,
    PREPARING_WS_TIMEOUT_SECS, STATUS_QUERY_TIMEOUT_SECS,
};
use crate::models::DiagnosticSource;
use crate::security::validate_path_component;

fn default_timeout_secs() -> u64 {
    PREPARING_WS_TIMEOUT_SECS
}

fn default_status_timeout_secs() -> u64 {
    STATUS_QUERY_TIMEOUT_SECS
}

fn default_shell() -> String {
    DEFAULT_SHELL.to_string()
}

/// Sources and remote copy tool for container-backed workspaces.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DockerSettings {
    pub binary: String,
    pub sources: Vec<DiagnosticSource>,
}

/// Sources and remote copy tool for pod-backed workspaces.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OpenshiftSettings {
    pub binary: String,
    pub namespace: String,
    pub sources: Vec<DiagnosticSource>,
}

/// Operator-defined retrieval command.
///
/// `template` may reference `{workspace_id}`, `{remote}` and `{dest}`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CustomSettings {
    pub template: String,
    #[serde(default)]
    pub sources: Vec<DiagnosticSource>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CollectorConfig {
    pub version: String,
    pub description: String,
    /// Destination root; `$VAR` and `${VAR}` are expanded
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub preparation_timeout_secs: u64,
    #[serde(default = "default_shell")]
    pub shell: String,
    /// Command printing the workspace status; may use `{workspace_id}`
    #[serde(default)]
    pub status_command: Option<String>,
    #[serde(default = "default_status_timeout_secs")]
    pub status_timeout_secs: u64,
    pub docker: DockerSettings,
    pub openshift: OpenshiftSettings,
    #[serde(default)]
    pub custom: Option<CustomSettings>,
}

impl CollectorConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: CollectorConfig =
            serde_yaml::from_str(&content).context("Failed to parse YAML config")?;
        config
            .validate()
            .context(format!("Invalid configuration in {}", path.display()))?;

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save_to_yaml_file(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self).context("Failed to serialize config to YAML")?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .context(format!("Failed to create directory: {}", parent.display()))?;
            }
        }

        fs::write(path, yaml).context(format!("Failed to write config to {}", path.display()))?;

        info!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Check the invariants the collector relies on.
    pub fn validate(&self) -> Result<()> {
        if self.preparation_timeout_secs == 0 {
            bail!("preparation_timeout_secs must be greater than zero");
        }
        if self.status_timeout_secs == 0 {
            bail!("status_timeout_secs must be greater than zero");
        }
        if self.shell.trim().is_empty() {
            bail!("shell must not be empty");
        }

        check_sources("docker", &self.docker.sources)?;
        check_sources("openshift", &self.openshift.sources)?;

        if let Some(custom) = &self.custom {
            if !custom.template.contains(PLACEHOLDER_DEST) {
                bail!("custom template must reference {}", PLACEHOLDER_DEST);
            }
            check_sources("custom", &custom.sources)?;
        }

        if let Some(command) = &self.status_command {
            if !command.contains(PLACEHOLDER_WORKSPACE_ID) {
                bail!("status_command must reference {}", PLACEHOLDER_WORKSPACE_ID);
            }
        }

        Ok(())
    }

    pub fn preparation_timeout(&self) -> Duration {
        Duration::from_secs(self.preparation_timeout_secs)
    }

    pub fn status_timeout(&self) -> Duration {
        Duration::from_secs(self.status_timeout_secs)
    }

    /// Destination root with environment variables expanded.
    pub fn destination_root(&self) -> PathBuf {
        match &self.destination {
            Some(dest) => PathBuf::from(expand_env_vars(dest)),
            None => std::env::temp_dir().join(DEFAULT_OUTPUT_DIR),
        }
    }

    /// Create a default configuration YAML file
    pub fn create_default_config_file(path: &Path) -> Result<()> {
        CollectorConfig::default().save_to_yaml_file(path)
    }
}

fn check_sources(kind: &str, sources: &[DiagnosticSource]) -> Result<()> {
    let mut seen = HashSet::new();
    for source in sources {
        validate_path_component("source name", &source.name)
            .context(format!("Invalid {} source", kind))?;
        if source.remote_location.trim().is_empty() {
            bail!("{} source {} has an empty remote location", kind, source.name);
        }
        if !seen.insert(source.name.as_str()) {
            bail!("{} source name {} is defined more than once", kind, source.name);
        }
    }
    Ok(())
}

/// Load a configuration file or create a default one.
///
/// # Arguments
///
/// * `config_path` - Optional path to a configuration file
///
/// # Returns
///
/// * The parsed file if `config_path` exists
/// * A freshly written default if `config_path` does not exist yet
/// * The built-in default if no path is given
pub fn load_or_create_config(config_path: Option<&Path>) -> Result<CollectorConfig> {
    match config_path {
        Some(path) if path.exists() => CollectorConfig::from_yaml_file(path),
        Some(path) => {
            info!("Creating default config at {}", path.display());
            let default_config = CollectorConfig::default();
            default_config.save_to_yaml_file(path)?;
            Ok(default_config)
        }
        None => {
            info!("No config path provided, using default configuration");
            Ok(CollectorConfig::default())
        }
    }
}
