//! Command Context
//!
//! Everything a meteor command needs besides its collaborators.

use std::path::PathBuf;

use crate::config::{Config, SettingsSource};
use crate::domain::entities::Session;
use crate::domain::services::LogsOptions;
use crate::fs::absolutize;

/// Inputs shared by every meteor command
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub config: Config,
    /// Directory relative config paths resolve against; always absolute
    pub base_path: PathBuf,
    /// Remote scripts and templates
    pub assets_dir: PathBuf,
    pub settings: SettingsSource,
    /// Explicit sessions; derived from the config when `None`
    pub sessions: Option<Vec<Session>>,
    pub verbose: bool,
    /// Reuse the previous bundle instead of building
    pub cached_build: bool,
    pub logs: LogsOptions,
}

impl CommandContext {
    pub fn new(config: Config, base_path: impl Into<PathBuf>, assets_dir: impl Into<PathBuf>) -> Self {
        let base_path = absolutize(base_path);
        let settings = SettingsSource::Default(base_path.join(crate::config::DEFAULT_SETTINGS_FILE));
        Self {
            config,
            base_path,
            assets_dir: assets_dir.into(),
            settings,
            sessions: None,
            verbose: false,
            cached_build: false,
            logs: LogsOptions::default(),
        }
    }

    pub fn with_settings(mut self, settings: SettingsSource) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_sessions(mut self, sessions: Vec<Session>) -> Self {
        self.sessions = Some(sessions);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_cached_build(mut self, cached_build: bool) -> Self {
        self.cached_build = cached_build;
        self
    }

    pub fn with_logs(mut self, logs: LogsOptions) -> Self {
        self.logs = logs;
        self
    }
}
