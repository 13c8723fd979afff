use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use tokio::runtime::Runtime;

use workspace_collector::cli::{Args, CollectOptions, Commands};
use workspace_collector::collectors::engine::CollectionEngine;
use workspace_collector::collectors::inventory::inventory_for;
use workspace_collector::collectors::status::{
    CommandStatusProvider, StaticStatusProvider, WorkspaceStatusProvider,
};
use workspace_collector::config::{load_or_create_config, CollectorConfig};
use workspace_collector::models::{CollectionReport, RunState, WorkspaceKind};
use workspace_collector::security::validate_output_path;
use workspace_collector::utils::process::{CommandRunner, ProcessRunner};
use workspace_collector::utils::summary::write_collection_summary;
use workspace_collector::workspace::ResolvedWorkspace;

fn main() -> Result<()> {
    let args = Args::parse();

    initialize_logging(args.verbose)?;

    match args.command {
        Commands::InitConfig { path } => {
            info!("Creating default configuration file at {}", path.display());
            CollectorConfig::create_default_config_file(&path)?;
            info!("Configuration created successfully");
            Ok(())
        }
        Commands::Sources { kind } => {
            let config = load_or_create_config(args.config.as_deref())?;
            list_sources(&config, kind.into());
            Ok(())
        }
        Commands::Collect(opts) => {
            let config = load_or_create_config(args.config.as_deref())?;
            run_collect(config, opts)
        }
    }
}

/// Initialize logging with the specified verbosity level
fn initialize_logging(verbose: bool) -> Result<()> {
    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    TermLogger::init(
        log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .context("Failed to initialize logger")?;
    Ok(())
}

fn list_sources(config: &CollectorConfig, kind: WorkspaceKind) {
    let inventory = inventory_for(kind, config);
    let sources = inventory.list_sources();
    if sources.is_empty() {
        println!("No sources defined for {} workspaces", kind);
    }
    for source in sources {
        println!("{:<16} {}", source.name, source.remote_location);
    }
}

/// Apply command-line overrides on top of the loaded configuration
fn apply_overrides(mut config: CollectorConfig, opts: &CollectOptions) -> Result<CollectorConfig> {
    if let Some(timeout) = opts.timeout {
        if timeout == 0 {
            bail!("--timeout must be greater than zero");
        }
        config.preparation_timeout_secs = timeout;
    }
    if let Some(output) = &opts.output {
        config.destination = Some(output.to_string_lossy().to_string());
    }
    Ok(config)
}

fn status_provider(
    config: &CollectorConfig,
    opts: &CollectOptions,
    runner: Arc<dyn CommandRunner>,
) -> Arc<dyn WorkspaceStatusProvider> {
    match &config.status_command {
        Some(template) => Arc::new(
            CommandStatusProvider::new(&config.shell, template, runner)
                .with_timeout(config.status_timeout()),
        ),
        None => {
            info!(
                "No status command configured, assuming workspace status {}",
                workspace_collector::models::WorkspaceStatus::from(opts.assume_status)
            );
            Arc::new(StaticStatusProvider::new(opts.assume_status.into()))
        }
    }
}

fn run_collect(config: CollectorConfig, opts: CollectOptions) -> Result<()> {
    let config = apply_overrides(config, &opts)?;
    let destination: PathBuf = config.destination_root();
    validate_output_path(&destination)?;

    let kind: WorkspaceKind = opts.kind.into();
    let runner: Arc<dyn CommandRunner> = Arc::new(ProcessRunner::new());
    let engine = CollectionEngine::from_config(
        kind,
        &config,
        status_provider(&config, &opts, Arc::clone(&runner)),
        runner,
    );

    let name = opts.name.clone().unwrap_or_else(|| opts.workspace_id.clone());
    let workspace = ResolvedWorkspace::new(name, kind, opts.workspace_id.clone());

    let runtime = Runtime::new().context("Failed to create Tokio runtime")?;
    let report = runtime.block_on(engine.collect(&workspace, &destination));

    print_report(&report);

    if let Some(path) = opts.summary_path(&destination) {
        // a summary that cannot be written must not turn the run into a failure
        if let Err(e) = write_collection_summary(&report, &path) {
            warn!("{:#}", e);
        }
    }

    Ok(())
}

fn print_report(report: &CollectionReport) {
    match &report.state {
        RunState::Aborted(reason) => {
            println!("Collection for {} skipped: {}", report.workspace_name, reason);
        }
        RunState::Completed => {
            for outcome in &report.outcomes {
                let status = if outcome.succeeded {
                    "ok"
                } else if outcome.timed_out {
                    "timeout"
                } else {
                    "failed"
                };
                let location = outcome
                    .artifact_dir
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!("{:<8} {:<16} {}", status, outcome.name, location);
            }
            println!(
                "{} of {} source(s) grabbed",
                report.succeeded_count(),
                report.outcomes.len()
            );
        }
    }
}
