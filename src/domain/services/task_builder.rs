//! Task list construction
//!
//! Decides which remote actions each command needs, in which order, based
//! on the shape of the resolved configuration. Nothing here touches a host;
//! the resulting `TaskList` is handed to an `ExecutionEngine`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};

use crate::domain::entities::{TaskList, TaskVars};
use crate::domain::value_objects::Stage;
use crate::error::{ShipError, ShipResult};
use crate::fs::{resolve_path, shell_quote};

use super::resolver::ResolvedConfig;

/// Environment key carrying the serialized application settings
pub const SETTINGS_ENV_KEY: &str = "METEOR_SETTINGS";

/// Options for the `logs` command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogsOptions {
    pub tail: Option<u32>,
    pub follow: bool,
}

/// Builds the task list for each command from a resolved configuration
pub struct TaskListBuilder<'a> {
    config: &'a ResolvedConfig,
    assets_dir: PathBuf,
    base_path: PathBuf,
}

impl<'a> TaskListBuilder<'a> {
    /// `assets_dir` holds the remote scripts and templates; `base_path` is
    /// what relative certificate paths resolve against.
    pub fn new(config: &'a ResolvedConfig, assets_dir: &Path, base_path: &Path) -> Self {
        Self {
            config,
            assets_dir: assets_dir.to_path_buf(),
            base_path: base_path.to_path_buf(),
        }
    }

    /// Remote path of a file in the app's config directory
    pub fn remote_config_file(config: &ResolvedConfig, file: &str) -> String {
        format!("{}/config/{}", config.remote_root(), file)
    }

    fn asset(&self, name: &str) -> PathBuf {
        self.assets_dir.join(name)
    }

    fn template(&self, name: &str) -> PathBuf {
        self.assets_dir.join("templates").join(name)
    }

    fn app_name_vars(&self) -> TaskVars {
        let mut vars = TaskVars::new();
        vars.insert("app_name".to_string(), json!(self.config.name));
        vars
    }

    /// Environment preparation, then the SSL block when certificates are managed by hand
    pub fn setup(&self) -> ShipResult<TaskList> {
        let mut list = TaskList::new(Stage::Setup.task_list_title());

        list.execute_script(
            "Setup Environment",
            self.asset("meteor-setup.sh"),
            self.app_name_vars(),
        );

        let ssl = match &self.config.ssl {
            Some(ssl) if !ssl.is_fully_automatic() => ssl,
            _ => return Ok(list),
        };

        if ssl.upload {
            let (crt, key) = match (&ssl.crt, &ssl.key) {
                (Some(crt), Some(key)) => (crt, key),
                _ => {
                    return Err(ShipError::InvalidConfiguration(
                        "meteor.ssl needs both crt and key unless upload = false".to_string(),
                    ))
                }
            };

            list.execute_script(
                "Cleaning up SSL Certificates",
                self.asset("ssl-cleanup.sh"),
                self.app_name_vars(),
            );
            list.copy(
                "Copying SSL Certificate Bundle",
                resolve_path(&self.base_path, crt),
                Self::remote_config_file(self.config, "bundle.crt"),
            );
            list.copy(
                "Copying SSL Private Key",
                resolve_path(&self.base_path, key),
                Self::remote_config_file(self.config, "private.key"),
            );
        }

        list.execute_script(
            "Verifying SSL Configurations",
            self.asset("verify-ssl-config.sh"),
            self.app_name_vars(),
        );

        Ok(list)
    }

    /// Upload the bundle to the staging path on the host
    pub fn push(&self, bundle_path: &Path) -> TaskList {
        let mut list = TaskList::new(Stage::Push.task_list_title());
        list.copy_with_progress(
            "Pushing Meteor App Bundle to The Server",
            bundle_path,
            format!("{}/tmp/bundle.tar.gz", self.config.remote_root()),
            self.config.enable_upload_progress_bar,
        );
        list
    }

    /// Startup script and environment file. Host registration is planned
    /// separately by `SessionFanout`.
    pub fn envconfig(&self, settings: &Value) -> ShipResult<TaskList> {
        let config = self.config;
        let mut list = TaskList::new(Stage::EnvConfig.task_list_title());

        let mut start_vars = self.app_name_vars();
        start_vars.insert(
            "use_local_mongo".to_string(),
            json!(if config.use_local_mongo { 1 } else { 0 }),
        );
        start_vars.insert("port".to_string(), json!(config.app_port()));
        start_vars.insert("bind".to_string(), json!(config.docker.bind));
        start_vars.insert("ssl_config".to_string(), serde_json::to_value(&config.ssl)?);
        start_vars.insert("log_config".to_string(), serde_json::to_value(&config.log)?);
        start_vars.insert("volumes".to_string(), serde_json::to_value(&config.volumes)?);
        start_vars.insert("docker".to_string(), serde_json::to_value(&config.docker)?);
        start_vars.insert(
            "nginx_client_upload_limit".to_string(),
            json!(config.nginx.client_upload_limit),
        );

        list.copy_template(
            "Pushing the Startup Script",
            self.template("start.sh"),
            Self::remote_config_file(config, "start.sh"),
            start_vars,
        );

        let mut env_vars = self.app_name_vars();
        env_vars.insert(
            "env".to_string(),
            serde_json::to_value(environment_for(&config.env, settings)?)?,
        );

        list.copy_template(
            "Sending Environment Variables",
            self.template("env.list"),
            Self::remote_config_file(config, "env.list"),
            env_vars,
        );

        Ok(list)
    }

    /// Start the container, then wait for it to answer
    pub fn start(&self) -> TaskList {
        let mut list = TaskList::new(Stage::Start.task_list_title());

        list.execute_script("Start Meteor", self.asset("meteor-start.sh"), self.app_name_vars());

        let mut check_vars = self.app_name_vars();
        check_vars.insert(
            "deploy_check_wait_time".to_string(),
            json!(self.config.deploy_check_wait_time),
        );
        check_vars.insert(
            "deploy_check_port".to_string(),
            json!(self.config.deploy_check_port()),
        );
        list.execute_script(
            "Verifying Deployment",
            self.asset("meteor-deploy-check.sh"),
            check_vars,
        );

        list
    }

    pub fn stop(&self) -> TaskList {
        let mut list = TaskList::new(Stage::Stop.task_list_title());
        list.execute_script("Stop Meteor", self.asset("meteor-stop.sh"), self.app_name_vars());
        list
    }

    pub fn logs(&self, options: &LogsOptions) -> TaskList {
        let mut command = String::from("sudo docker logs");
        if let Some(tail) = options.tail {
            command.push_str(&format!(" --tail {}", tail));
        }
        if options.follow {
            command.push_str(" -f");
        }
        command.push(' ');
        command.push_str(&shell_quote(&self.config.name));

        let mut list = TaskList::new(Stage::Logs.task_list_title());
        list.execute("Fetching Logs", command);
        list
    }
}

/// Environment delivered to the container.
///
/// A copy of `env` with the serialized settings added and `PORT` removed;
/// the container port is fixed and the published port is set by the
/// startup script instead.
pub fn environment_for(
    env: &BTreeMap<String, String>,
    settings: &Value,
) -> ShipResult<BTreeMap<String, String>> {
    let mut env = env.clone();
    env.insert(SETTINGS_ENV_KEY.to_string(), serde_json::to_string(settings)?);
    env.remove("PORT");
    Ok(env)
}
