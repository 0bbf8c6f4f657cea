//! SSH Execution Engine
//!
//! Implements `ExecutionEngine` with the system `ssh` and `scp` binaries.
//!
//! - Script tasks are rendered and piped to `bash -s` on the host
//! - Copy tasks with vars are rendered into a temporary file, then copied
//! - Command tasks have their output captured into the run report
//!
//! In series mode hosts run one after another and the first failure stops
//! the run. Otherwise each host gets its own thread and every host runs to
//! completion before the first failure is reported.

mod template;

pub use template::render;

use std::ffi::OsString;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use crate::domain::entities::{Session, Task, TaskList};
use crate::domain::ports::{CommandOutput, ExecutionEngine, RunOptions, RunReport};
use crate::error::{ShipError, ShipResult};

/// Execution engine over OpenSSH
#[derive(Debug, Clone)]
pub struct SshEngine {
    ssh: OsString,
    scp: OsString,
}

impl Default for SshEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SshEngine {
    pub fn new() -> Self {
        Self {
            ssh: OsString::from("ssh"),
            scp: OsString::from("scp"),
        }
    }

    /// Use different `ssh` / `scp` executables
    pub fn with_binaries(ssh: impl Into<OsString>, scp: impl Into<OsString>) -> Self {
        Self {
            ssh: ssh.into(),
            scp: scp.into(),
        }
    }

    /// Connection arguments for `ssh`
    pub fn ssh_args(session: &Session) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-o".into(),
            "BatchMode=yes".into(),
            "-p".into(),
            session.port.to_string().into(),
        ];
        if let Some(pem) = &session.pem {
            args.push("-i".into());
            args.push(pem.into());
        }
        args.push(session.destination().into());
        args
    }

    /// Arguments for `scp`, ending with source and remote target
    pub fn scp_args(session: &Session, src: &Path, dest: &str, progress: bool) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-o".into(),
            "BatchMode=yes".into(),
            "-P".into(),
            session.port.to_string().into(),
        ];
        if !progress {
            args.push("-q".into());
        }
        if let Some(pem) = &session.pem {
            args.push("-i".into());
            args.push(pem.into());
        }
        args.push(src.into());
        args.push(format!("{}:{}", session.destination(), dest).into());
        args
    }

    fn run_on(&self, tasks: &TaskList, session: &Session, verbose: bool) -> ShipResult<RunReport> {
        let mut report = RunReport::default();

        for task in tasks.tasks() {
            tracing::info!("[{}] {}", session.server, task.title());
            match task {
                Task::Script { path, vars, .. } => {
                    let script = render(&std::fs::read_to_string(path)?, vars)?;
                    let mut cmd = Command::new(&self.ssh);
                    cmd.args(Self::ssh_args(session)).arg("bash -s");
                    let output = run_process(cmd, Some(script.as_bytes()), verbose)?;
                    check(&output, session, task)?;
                }
                Task::Copy {
                    src,
                    dest,
                    vars,
                    progress_bar,
                    ..
                } => {
                    // keeps the rendered file alive until scp is done
                    let rendered = match vars {
                        Some(vars) => {
                            let mut file = tempfile::NamedTempFile::new()?;
                            file.write_all(render(&std::fs::read_to_string(src)?, vars)?.as_bytes())?;
                            file.flush()?;
                            Some(file)
                        }
                        None => None,
                    };
                    let local = rendered.as_ref().map(|f| f.path()).unwrap_or(src.as_path());

                    let mut cmd = Command::new(&self.scp);
                    cmd.args(Self::scp_args(session, local, dest, *progress_bar));
                    let output = run_process(cmd, None, verbose || *progress_bar)?;
                    check(&output, session, task)?;
                }
                Task::Command { command, .. } => {
                    let mut cmd = Command::new(&self.ssh);
                    cmd.args(Self::ssh_args(session)).arg(command);
                    let output = run_process(cmd, None, verbose)?;
                    check(&output, session, task)?;
                    report.outputs.push(CommandOutput {
                        server: session.server.clone(),
                        task: task.title().to_string(),
                        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                    });
                }
            }
        }

        Ok(report)
    }
}

impl ExecutionEngine for SshEngine {
    fn run(
        &self,
        tasks: &TaskList,
        sessions: &[Session],
        options: RunOptions,
    ) -> ShipResult<RunReport> {
        tracing::debug!(
            "running '{}' on {} host(s), series={}",
            tasks.title(),
            sessions.len(),
            options.series
        );

        let mut report = RunReport::default();

        if options.series {
            for session in sessions {
                report.merge(self.run_on(tasks, session, options.verbose)?);
            }
            return Ok(report);
        }

        let results: Vec<ShipResult<RunReport>> = std::thread::scope(|scope| {
            let handles: Vec<_> = sessions
                .iter()
                .map(|session| scope.spawn(move || self.run_on(tasks, session, options.verbose)))
                .collect();
            handles
                .into_iter()
                .zip(sessions)
                .map(|(handle, session)| {
                    handle.join().unwrap_or_else(|_| {
                        Err(ShipError::ExecutionFailure {
                            host: session.server.clone(),
                            task: tasks.title().to_string(),
                            message: "worker thread panicked".to_string(),
                        })
                    })
                })
                .collect()
        });

        for result in results {
            report.merge(result?);
        }
        Ok(report)
    }
}

/// Run a process; with `stream` its output goes straight to the terminal
fn run_process(mut cmd: Command, input: Option<&[u8]>, stream: bool) -> ShipResult<Output> {
    cmd.stdin(if input.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    });
    if stream {
        cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
    } else {
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
    }

    let mut child = cmd.spawn()?;
    if let Some(input) = input {
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(input)?;
        }
    }
    Ok(child.wait_with_output()?)
}

fn check(output: &Output, session: &Session, task: &Task) -> ShipResult<()> {
    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    let message = match stderr.trim() {
        "" => output.status.to_string(),
        detail => detail.to_string(),
    };
    Err(ShipError::ExecutionFailure {
        host: session.server.clone(),
        task: task.title().to_string(),
        message,
    })
}
