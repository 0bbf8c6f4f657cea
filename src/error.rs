//! Error types for mupship
//!
//! Every pipeline stage returns a typed error; only `main` turns these into
//! a diagnostic line and a process exit status.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::value_objects::Stage;

/// Result type alias for mupship operations
pub type ShipResult<T> = Result<T, ShipError>;

/// Main error type for mupship operations
#[derive(Error, Debug)]
pub enum ShipError {
    /// The `[meteor]` section is absent from the configuration
    #[error("no configs found for meteor")]
    MissingConfiguration,

    /// `--cached-build` was requested but nothing was built before
    #[error(
        "unable to use previous build, it doesn't exist at {}. Remove the \"--cached-build\" option and try again",
        bundle_path.display()
    )]
    BuildCacheMiss { bundle_path: PathBuf },

    /// A remote task failed on a host
    #[error("task '{task}' failed on {host}: {message}")]
    ExecutionFailure {
        host: String,
        task: String,
        message: String,
    },

    /// A pipeline stage failed; later stages were not run
    #[error("{stage} failed")]
    StageFailed {
        stage: Stage,
        #[source]
        source: Box<ShipError>,
    },

    /// A server listed under `meteor.servers` has no session to run on
    #[error("no session available for server '{server}'")]
    MissingSession { server: String },

    /// `meteor.servers` names a server missing from the top-level `servers` table
    #[error("server '{server}' is not defined in the top-level [servers] table")]
    UnknownServer { server: String },

    /// The configuration is present but unusable
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Application settings could not be read
    #[error("invalid settings in {}: {message}", path.display())]
    InvalidSettings { path: PathBuf, message: String },

    /// The configuration file could not be parsed
    #[error("failed to parse {}: {message}", file.display())]
    ConfigParse { file: PathBuf, message: String },

    /// The local bundler failed
    #[error("build failed: {0}")]
    BuildFailed(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ShipError {
    /// Wrap an error with the pipeline stage it came from
    pub fn in_stage(self, stage: Stage) -> Self {
        ShipError::StageFailed {
            stage,
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping stage wrappers
    pub fn root_cause(&self) -> &ShipError {
        match self {
            ShipError::StageFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// The stage that failed, if this error came out of a pipeline
    pub fn failed_stage(&self) -> Option<Stage> {
        match self {
            ShipError::StageFailed { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        1
    }
}
