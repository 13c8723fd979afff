use std::path::{Path, PathBuf};

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};

use crate::constants::DEFAULT_SUMMARY_NAME;
use crate::models::{WorkspaceKind, WorkspaceStatus};

/// Command-line arguments for the workspace log collector.
#[derive(Parser, Debug)]
#[clap(name = "ws-collect", about = "Collect diagnostic logs from remote workspaces")]
pub struct Args {
    /// Verbose logging
    #[clap(short, long, global = true)]
    pub verbose: bool,

    /// Path to configuration YAML file
    #[clap(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Grab the logs of one workspace
    Collect(CollectOptions),

    /// Create a default configuration file
    InitConfig {
        /// Path where the configuration file will be written
        #[clap(short, long, default_value = "ws-collect.yaml")]
        path: PathBuf,
    },

    /// List the diagnostic sources known for a workspace kind
    Sources {
        #[clap(short, long, value_enum)]
        kind: KindArg,
    },
}

#[derive(ClapArgs, Debug)]
pub struct CollectOptions {
    /// ID of the workspace
    #[clap(short = 'w', long)]
    pub workspace_id: String,

    /// Kind of environment backing the workspace
    #[clap(short, long, value_enum)]
    pub kind: KindArg,

    /// Human readable workspace name (defaults to the ID)
    #[clap(short, long)]
    pub name: Option<String>,

    /// Destination root (overrides the configured destination)
    #[clap(short, long)]
    pub output: Option<PathBuf>,

    /// Timeout for each retrieval command, in seconds
    #[clap(short, long)]
    pub timeout: Option<u64>,

    /// Write a JSON summary of the run; without a value it goes to the destination root
    #[clap(short, long, num_args = 0..=1, value_name = "FILE")]
    pub summary: Option<Option<PathBuf>>,

    /// Status to assume when no status command is configured
    #[clap(long, value_enum, default_value = "running")]
    pub assume_status: StatusArg,
}

impl CollectOptions {
    /// Where the JSON summary goes, if one was requested.
    pub fn summary_path(&self, destination: &Path) -> Option<PathBuf> {
        match &self.summary {
            Some(Some(path)) => Some(path.clone()),
            Some(None) => Some(destination.join(DEFAULT_SUMMARY_NAME)),
            None => None,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    Docker,
    Openshift,
    Custom,
}

impl From<KindArg> for WorkspaceKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Docker => WorkspaceKind::Docker,
            KindArg::Openshift => WorkspaceKind::Openshift,
            KindArg::Custom => WorkspaceKind::Custom,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusArg {
    Starting,
    Running,
    Stopping,
    Stopped,
    Error,
}

impl From<StatusArg> for WorkspaceStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::Starting => WorkspaceStatus::Starting,
            StatusArg::Running => WorkspaceStatus::Running,
            StatusArg::Stopping => WorkspaceStatus::Stopping,
            StatusArg::Stopped => WorkspaceStatus::Stopped,
            StatusArg::Error => WorkspaceStatus::Error,
        }
    }
}
