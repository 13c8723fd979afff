// Re-export all items from the submodules
mod collection_config;
mod default_configs;
mod env_vars;

pub use collection_config::{
    load_or_create_config, CollectorConfig, CustomSettings, DockerSettings, OpenshiftSettings,
};

pub use default_configs::default_workspace_sources;

pub use env_vars::expand_env_vars;
