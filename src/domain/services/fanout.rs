//! Host registration fan-out
//!
//! After `envconfig` every server gets its own `SERVER_HOST` line appended
//! to the environment file. Each server is paired with its session by name
//! and becomes an independent single-task dispatch.

use crate::domain::entities::{Session, TaskList};
use crate::error::{ShipError, ShipResult};
use crate::fs::shell_quote;

use super::resolver::ResolvedConfig;
use super::task_builder::TaskListBuilder;

pub const REGISTRATION_TITLE: &str = "Sending Server Host";

/// One server's registration, ready to dispatch on its own session
#[derive(Debug, Clone, PartialEq)]
pub struct HostRegistration {
    pub server: String,
    pub session: Session,
    pub server_host: String,
    pub tasks: TaskList,
}

pub struct SessionFanout;

impl SessionFanout {
    /// Pair every `meteor.servers` entry with the session of the same name.
    ///
    /// Everything is planned up front: a server without a session or
    /// without `SERVER_HOST` fails before anything is dispatched.
    pub fn plan(config: &ResolvedConfig, sessions: &[Session]) -> ShipResult<Vec<HostRegistration>> {
        let env_file = TaskListBuilder::remote_config_file(config, "env.list");

        config
            .servers
            .iter()
            .map(|(server, server_config)| {
                let session = sessions
                    .iter()
                    .find(|s| s.server == server)
                    .ok_or_else(|| ShipError::MissingSession {
                        server: server.to_string(),
                    })?;

                let server_host = server_config.server_host().ok_or_else(|| {
                    ShipError::InvalidConfiguration(format!(
                        "meteor.servers.{}.env.SERVER_HOST is not set",
                        server
                    ))
                })?;

                let mut tasks = TaskList::new(REGISTRATION_TITLE);
                tasks.execute(
                    "echo to file",
                    format!(
                        "echo {} >> {file}; cat {file}",
                        shell_quote(&format!("SERVER_HOST={}", server_host)),
                        file = env_file
                    ),
                );

                Ok(HostRegistration {
                    server: server.to_string(),
                    session: session.clone(),
                    server_host: server_host.to_string(),
                    tasks,
                })
            })
            .collect()
    }
}
