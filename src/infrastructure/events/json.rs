//! JSON Event Sink
//!
//! Outputs pipeline events as NDJSON for CI/automation consumption.

use crate::domain::ports::{DeployEventSink, PipelineEvent};
use std::io::{self, Write};
use std::sync::Mutex;

/// Event sink that outputs NDJSON events to stdout
pub struct JsonEventSink {
    /// Mutex to ensure thread-safe writes
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout() -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Create a JSON event sink writing to a custom writer (for testing)
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

impl DeployEventSink for JsonEventSink {
    fn on_event(&self, event: PipelineEvent) {
        let json = match event {
            PipelineEvent::StageStarted { stage, hosts } => serde_json::json!({
                "event": "stage_start",
                "stage": stage,
                "title": stage.task_list_title(),
                "hosts": hosts,
            }),

            PipelineEvent::StageCompleted { stage } => serde_json::json!({
                "event": "stage_complete",
                "stage": stage,
            }),

            PipelineEvent::StageFailed { stage, error } => serde_json::json!({
                "event": "stage_error",
                "stage": stage,
                "error": error,
            }),

            PipelineEvent::BuildStarted { app_path } => serde_json::json!({
                "event": "build_start",
                "app_path": app_path.display().to_string(),
            }),

            PipelineEvent::BuildReused { build_location } => serde_json::json!({
                "event": "build_reused",
                "build_location": build_location.display().to_string(),
            }),

            PipelineEvent::HostRegistered {
                server,
                server_host,
            } => serde_json::json!({
                "event": "host_registered",
                "server": server,
                "server_host": server_host,
            }),

            PipelineEvent::CommandOutput {
                server,
                stdout,
                stderr,
            } => serde_json::json!({
                "event": "output",
                "server": server,
                "stdout": stdout,
                "stderr": stderr,
            }),
        };

        self.write_event(json);
    }
}
