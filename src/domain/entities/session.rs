//! Session entity - an execution context bound to one host.

use std::path::PathBuf;

use serde::Serialize;

use crate::config::{Config, HostConfig};
use crate::error::{ShipError, ShipResult};
use crate::fs::resolve_path;

/// Connection details for exactly one target host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    /// Server name from the configuration
    pub server: String,
    pub host: String,
    pub username: String,
    pub port: u16,
    pub pem: Option<PathBuf>,
}

impl Session {
    pub fn new(server: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            host: host.into(),
            username: "root".to_string(),
            port: 22,
            pem: None,
        }
    }

    /// Build a session from a `[servers.<name>]` table; `pem` resolves against `base_path`
    pub fn from_host_config(
        server: &str,
        host: &HostConfig,
        base_path: &std::path::Path,
    ) -> Self {
        Self {
            server: server.to_string(),
            host: host.host.clone(),
            username: host.username.clone(),
            port: host.port,
            pem: host.pem.as_deref().map(|p| resolve_path(base_path, p)),
        }
    }

    /// `user@host` destination for ssh/scp
    pub fn destination(&self) -> String {
        format!("{}@{}", self.username, self.host)
    }

    /// Sessions the meteor commands run on, in `meteor.servers` order.
    ///
    /// With an empty `meteor.servers` every top-level server is targeted.
    pub fn for_meteor(config: &Config, base_path: &std::path::Path) -> ShipResult<Vec<Self>> {
        let meteor = config.meteor.as_ref().ok_or(ShipError::MissingConfiguration)?;

        if meteor.servers.is_empty() {
            return Ok(config
                .servers
                .iter()
                .map(|(name, host)| Self::from_host_config(name, host, base_path))
                .collect());
        }

        meteor
            .servers
            .keys()
            .map(|name| {
                config
                    .servers
                    .get(name)
                    .map(|host| Self::from_host_config(name, host, base_path))
                    .ok_or_else(|| ShipError::UnknownServer {
                        server: name.to_string(),
                    })
            })
            .collect()
    }
}
