//! Execution Engine Port
//!
//! Runs a task list on a set of sessions. The SSH implementation lives in
//! infrastructure; tests use recording mocks.

use crate::domain::entities::{Session, TaskList};
use crate::error::ShipResult;

/// How a task list is dispatched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Finish one host's whole task list before starting the next
    pub series: bool,
    /// Stream remote output as it happens
    pub verbose: bool,
}

impl RunOptions {
    pub fn series(verbose: bool) -> Self {
        Self {
            series: true,
            verbose,
        }
    }

    pub fn parallel(verbose: bool) -> Self {
        Self {
            series: false,
            verbose,
        }
    }
}

/// Output captured from a command task
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub server: String,
    pub task: String,
    pub stdout: String,
    pub stderr: String,
}

/// What a run produced besides success
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub outputs: Vec<CommandOutput>,
}

impl RunReport {
    pub fn merge(&mut self, other: RunReport) {
        self.outputs.extend(other.outputs);
    }
}

/// Runs task lists on remote hosts.
///
/// Completes when every targeted host finished every task; fails with
/// `ShipError::ExecutionFailure` if any task on any host fails.
pub trait ExecutionEngine: Send + Sync {
    fn run(&self, tasks: &TaskList, sessions: &[Session], options: RunOptions)
        -> ShipResult<RunReport>;
}

impl<T: ExecutionEngine + ?Sized> ExecutionEngine for &T {
    fn run(
        &self,
        tasks: &TaskList,
        sessions: &[Session],
        options: RunOptions,
    ) -> ShipResult<RunReport> {
        (**self).run(tasks, sessions, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_merge_keeps_order() {
        let mut report = RunReport {
            outputs: vec![CommandOutput {
                server: "web1".to_string(),
                ..Default::default()
            }],
        };
        report.merge(RunReport {
            outputs: vec![CommandOutput {
                server: "web2".to_string(),
                ..Default::default()
            }],
        });
        let servers: Vec<_> = report.outputs.iter().map(|o| o.server.as_str()).collect();
        assert_eq!(servers, vec!["web1", "web2"]);
    }
}
