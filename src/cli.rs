use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mupship::domain::services::LogsOptions;
use mupship::domain::value_objects::Stage;

/// mupship - build a Meteor app and ship it to Docker hosts over SSH
#[derive(Parser, Debug)]
#[command(name = "mupship")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file
    #[arg(long, global = true, default_value = mupship::config::DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Application settings (JSON); defaults to settings.json next to the config
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Output format for CI
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Prepare the hosts (directories, SSL certificates)
    Setup,

    /// Build the bundle and upload it
    Push {
        /// Reuse the bundle from the previous build
        #[arg(long)]
        cached_build: bool,
    },

    /// Upload the startup script and environment
    Envconfig,

    /// Start the app and verify it answers
    Start,

    /// Stop the app
    Stop,

    /// push, envconfig and start, stopping at the first failure
    Deploy {
        /// Reuse the bundle from the previous build
        #[arg(long)]
        cached_build: bool,
    },

    /// Show container logs from every host
    Logs {
        /// Only the last N lines
        #[arg(long)]
        tail: Option<u32>,

        /// Keep streaming
        #[arg(short, long)]
        follow: bool,
    },
}

impl Commands {
    /// Stage a single command maps to; `None` for the deploy pipeline
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Commands::Setup => Some(Stage::Setup),
            Commands::Push { .. } => Some(Stage::Push),
            Commands::Envconfig => Some(Stage::EnvConfig),
            Commands::Start => Some(Stage::Start),
            Commands::Stop => Some(Stage::Stop),
            Commands::Logs { .. } => Some(Stage::Logs),
            Commands::Deploy { .. } => None,
        }
    }

    pub fn cached_build(&self) -> bool {
        matches!(
            self,
            Commands::Push { cached_build: true } | Commands::Deploy { cached_build: true }
        )
    }

    pub fn logs_options(&self) -> LogsOptions {
        match self {
            Commands::Logs { tail, follow } => LogsOptions {
                tail: *tail,
                follow: *follow,
            },
            _ => LogsOptions::default(),
        }
    }
}
