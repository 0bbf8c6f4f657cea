//! Console Event Sink
//!
//! Human-readable progress lines for interactive use.

use crate::domain::ports::{DeployEventSink, PipelineEvent};
use std::io::{self, Write};
use std::sync::Mutex;

pub struct ConsoleEventSink {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleEventSink {
    pub fn stdout() -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
        }
    }

    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    /// Text for an event; `None` for events with nothing to say
    pub fn format(event: &PipelineEvent) -> Option<String> {
        let text = match event {
            PipelineEvent::StageStarted { stage, hosts } => {
                format!("[{}] {} host(s)", stage.task_list_title(), hosts)
            }
            PipelineEvent::StageCompleted { stage } => {
                format!("[{}] done", stage.task_list_title())
            }
            PipelineEvent::StageFailed { stage, error } => {
                format!("[{}] failed: {}", stage.task_list_title(), error)
            }
            PipelineEvent::BuildStarted { .. } => "Building App Bundle Locally".to_string(),
            PipelineEvent::BuildReused { build_location } => format!(
                "Skipping build. Using previous build at\n{}",
                build_location.display()
            ),
            PipelineEvent::HostRegistered {
                server,
                server_host,
            } => format!("[{}] SERVER_HOST={}", server, server_host),
            PipelineEvent::CommandOutput {
                server,
                stdout,
                stderr,
            } => {
                if stdout.is_empty() && stderr.is_empty() {
                    return None;
                }
                let mut text = String::new();
                for line in stdout.lines().chain(stderr.lines()) {
                    text.push_str(&format!("[{}] {}\n", server, line));
                }
                text.pop();
                text
            }
        };
        Some(text)
    }
}

impl DeployEventSink for ConsoleEventSink {
    fn on_event(&self, event: PipelineEvent) {
        let Some(text) = Self::format(&event) else {
            return;
        };
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", text);
            let _ = writer.flush();
        }
    }
}
