//! Configuration module for mupship
//!
//! Sources, highest priority first:
//! 1. CLI flags (`--config`, `--settings`)
//! 2. Environment variables (`MUPSHIP_*`)
//! 3. The TOML config file (`mup.toml`) and the JSON settings file
//!
//! Defaults for the deployment section are not applied at load time; see
//! `domain::services::ConfigResolver`.

mod loader;
mod types;

pub use loader::{
    assets_dir, base_path_of, load_with_warnings, parse_with_warnings, ConfigWarning,
    SettingsSource, ASSETS_DIR_VAR, DEFAULT_CONFIG_FILE, DEFAULT_SETTINGS_FILE, SETTINGS_VAR,
};
pub use types::{
    BuildOptions, Config, DeploymentConfig, DockerConfig, HostConfig,
    LogConfig, MongoConfig, NginxConfig, OrderedMap, ServerConfig, SslConfig,
};
