//! Deploy Event Port
//!
//! Provides an observable interface for the meteor commands.
//! Enables progress reporting, JSON event streams, and debugging.

use std::path::PathBuf;

use crate::domain::value_objects::Stage;

/// Event emitted while a command or pipeline runs
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// A stage is about to dispatch its task list
    StageStarted { stage: Stage, hosts: usize },

    /// Every host finished the stage
    StageCompleted { stage: Stage },

    /// The stage failed; later stages will not run
    StageFailed { stage: Stage, error: String },

    /// The local bundler was invoked
    BuildStarted { app_path: PathBuf },

    /// `--cached-build`: an existing bundle is reused
    BuildReused { build_location: PathBuf },

    /// A server's `SERVER_HOST` was appended to its env file
    HostRegistered { server: String, server_host: String },

    /// Captured output of a command task
    CommandOutput {
        server: String,
        stdout: String,
        stderr: String,
    },
}

/// Trait for receiving pipeline events
///
/// Implementations can be:
/// - ConsoleEventSink: human-readable progress lines
/// - JsonEventSink: NDJSON event stream for CI
/// - NoopEventSink: Silent operation
pub trait DeployEventSink: Send + Sync {
    fn on_event(&self, event: PipelineEvent);
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl DeployEventSink for NoopEventSink {
    fn on_event(&self, _event: PipelineEvent) {}
}
