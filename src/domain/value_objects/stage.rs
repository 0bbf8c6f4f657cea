//! Stage value object - names one meteor command / pipeline step.

use serde::{Deserialize, Serialize};

/// A single deploy command, also used as a step of the `deploy` pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Prepare hosts (directories, SSL material)
    Setup,
    /// Upload the bundle archive
    Push,
    /// Write the startup script and environment file
    EnvConfig,
    /// Start the container and verify the deployment
    Start,
    /// Stop the container
    Stop,
    /// Read container logs
    Logs,
}

impl Stage {
    /// Title of the task list built for this stage
    pub fn task_list_title(&self) -> &'static str {
        match self {
            Stage::Setup => "Setup Meteor",
            Stage::Push => "Pushing Meteor App",
            Stage::EnvConfig => "Configuring App",
            Stage::Start => "Start Meteor",
            Stage::Stop => "Stop Meteor",
            Stage::Logs => "Meteor Logs",
        }
    }

    /// Whether hosts must be processed one at a time.
    ///
    /// Push, envconfig and start depend on remote state left by the previous
    /// stage, so they run in series. Setup and stop scripts are independent.
    pub fn runs_in_series(&self) -> bool {
        matches!(self, Stage::Push | Stage::EnvConfig | Stage::Start)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Setup => write!(f, "setup"),
            Stage::Push => write!(f, "push"),
            Stage::EnvConfig => write!(f, "envconfig"),
            Stage::Start => write!(f, "start"),
            Stage::Stop => write!(f, "stop"),
            Stage::Logs => write!(f, "logs"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependent_stages_run_in_series() {
        assert!(Stage::Push.runs_in_series());
        assert!(Stage::EnvConfig.runs_in_series());
        assert!(Stage::Start.runs_in_series());
        assert!(!Stage::Setup.runs_in_series());
        assert!(!Stage::Stop.runs_in_series());
        assert!(!Stage::Logs.runs_in_series());
    }

    #[test]
    fn display_matches_command_names() {
        assert_eq!(Stage::EnvConfig.to_string(), "envconfig");
        assert_eq!(Stage::Push.to_string(), "push");
    }
}
