//! Configuration resolution service
//!
//! Turns the `[meteor]` section as written into a complete value with every
//! default applied and legacy fields migrated. The input is only borrowed, so
//! repeated resolutions never observe each other.
//!
//! Legacy `docker_image` only fills an unset `docker.image`; legacy
//! `docker_image_frontend_server` always overrides `docker.image_frontend_server`.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::config::{
    BuildOptions, Config, DeploymentConfig, LogConfig, OrderedMap,
    ServerConfig, SslConfig,
};
use crate::error::{ShipError, ShipResult};

pub const DEFAULT_IMAGE: &str = "kadirahq/meteord";
pub const DEFAULT_FRONTEND_IMAGE: &str = "meteorhacks/mup-frontend-server";
/// Port the traditional meteord images listen on
pub const DEFAULT_IMAGE_PORT: u16 = 80;
pub const DEFAULT_SSL_PORT: u16 = 443;
pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_CLIENT_UPLOAD_LIMIT: &str = "10M";
pub const DEFAULT_APP_PORT: u16 = 80;
pub const DEFAULT_DEPLOY_CHECK_WAIT_TIME: u64 = 60;

/// Deployment section with all defaults applied
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedConfig {
    pub name: String,
    pub path: PathBuf,
    pub docker: ResolvedDocker,
    pub ssl: Option<ResolvedSsl>,
    pub env: BTreeMap<String, String>,
    pub log: LogConfig,
    pub nginx: ResolvedNginx,
    pub volumes: BTreeMap<String, String>,
    pub build_options: BuildOptions,
    pub servers: OrderedMap<ServerConfig>,
    pub enable_upload_progress_bar: bool,
    pub deploy_check_wait_time: u64,
    pub deploy_check_port: Option<u16>,
    pub use_local_mongo: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedDocker {
    pub image: String,
    pub image_frontend_server: String,
    pub image_port: u16,
    pub bind: String,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSsl {
    pub crt: Option<PathBuf>,
    pub key: Option<PathBuf>,
    pub port: u16,
    pub autogenerate: Option<serde_json::Value>,
    pub upload: bool,
}

impl ResolvedSsl {
    /// Certificates are provisioned on the host without any setup tasks
    pub fn is_fully_automatic(&self) -> bool {
        matches!(self.autogenerate, Some(serde_json::Value::Object(_)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedNginx {
    pub client_upload_limit: String,
}

impl ResolvedConfig {
    /// Port the app is published on: `env.PORT`, else 80
    pub fn app_port(&self) -> u16 {
        self.env
            .get("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_APP_PORT)
    }

    /// Port the deploy verification checks
    pub fn deploy_check_port(&self) -> u16 {
        self.deploy_check_port.unwrap_or_else(|| self.app_port())
    }

    /// Root directory of the app on every host
    pub fn remote_root(&self) -> String {
        format!("/opt/{}", self.name)
    }
}

/// Applies defaults and legacy migrations to the deployment section
pub struct ConfigResolver;

impl ConfigResolver {
    /// Resolve the `[meteor]` section of `config`.
    ///
    /// Fails with `MissingConfiguration` when the section is absent.
    pub fn resolve(config: &Config) -> ShipResult<ResolvedConfig> {
        let meteor = config.meteor.as_ref().ok_or(ShipError::MissingConfiguration)?;
        validate_name(&meteor.name)?;
        validate_port(meteor)?;

        Ok(ResolvedConfig {
            name: meteor.name.clone(),
            path: meteor.path.clone(),
            docker: resolve_docker(meteor),
            ssl: meteor.ssl.as_ref().map(resolve_ssl),
            env: meteor.env.clone(),
            log: meteor.log.clone().unwrap_or_else(default_log),
            nginx: ResolvedNginx {
                client_upload_limit: meteor
                    .nginx
                    .as_ref()
                    .and_then(|n| n.client_upload_limit.clone())
                    .unwrap_or_else(|| DEFAULT_CLIENT_UPLOAD_LIMIT.to_string()),
            },
            volumes: meteor.volumes.clone(),
            build_options: meteor.build_options.clone(),
            servers: meteor.servers.clone(),
            enable_upload_progress_bar: meteor.enable_upload_progress_bar,
            deploy_check_wait_time: meteor
                .deploy_check_wait_time
                .unwrap_or(DEFAULT_DEPLOY_CHECK_WAIT_TIME),
            deploy_check_port: meteor.deploy_check_port,
            use_local_mongo: config.mongo.is_some(),
        })
    }
}

fn resolve_docker(meteor: &DeploymentConfig) -> ResolvedDocker {
    let docker = meteor.docker.clone().unwrap_or_default();

    if docker.image.is_some() && meteor.docker_image.is_some() {
        tracing::warn!("both docker.image and legacy docker_image are set; using docker.image");
    }
    if docker.image_frontend_server.is_some() && meteor.docker_image_frontend_server.is_some() {
        tracing::warn!(
            "both docker.image_frontend_server and legacy docker_image_frontend_server are set; \
             using docker_image_frontend_server"
        );
    }

    ResolvedDocker {
        image: docker
            .image
            .or_else(|| meteor.docker_image.clone())
            .unwrap_or_else(|| DEFAULT_IMAGE.to_string()),
        // the legacy frontend field overrides the new one
        image_frontend_server: meteor
            .docker_image_frontend_server
            .clone()
            .or(docker.image_frontend_server)
            .unwrap_or_else(|| DEFAULT_FRONTEND_IMAGE.to_string()),
        image_port: docker.image_port.unwrap_or(DEFAULT_IMAGE_PORT),
        bind: docker.bind.unwrap_or_else(|| DEFAULT_BIND.to_string()),
        args: docker.args,
    }
}

fn resolve_ssl(ssl: &SslConfig) -> ResolvedSsl {
    ResolvedSsl {
        crt: ssl.crt.clone(),
        key: ssl.key.clone(),
        port: ssl.port.unwrap_or(DEFAULT_SSL_PORT),
        autogenerate: ssl.autogenerate.clone(),
        upload: ssl.upload != Some(false),
    }
}

fn default_log() -> LogConfig {
    let mut opts = BTreeMap::new();
    opts.insert("max-size".to_string(), serde_json::json!("100m"));
    opts.insert("max-file".to_string(), serde_json::json!(10));
    LogConfig { opts }
}

/// The name ends up in remote paths, container names and shell commands
fn validate_name(name: &str) -> ShipResult<()> {
    if name.is_empty() {
        return Err(ShipError::InvalidConfiguration(
            "meteor.name must not be empty".to_string(),
        ));
    }
    let valid = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if !valid || name.starts_with('.') {
        return Err(ShipError::InvalidConfiguration(format!(
            "meteor.name '{}' may only contain letters, digits, '-', '_' and '.'",
            name
        )));
    }
    Ok(())
}

fn validate_port(meteor: &DeploymentConfig) -> ShipResult<()> {
    match meteor.env.get("PORT") {
        Some(port) if port.parse::<u16>().is_err() => Err(ShipError::InvalidConfiguration(
            format!("meteor.env.PORT '{}' is not a valid port", port),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DockerConfig, NginxConfig};

    fn config_named(name: &str) -> Config {
        Config {
            meteor: Some(DeploymentConfig {
                name: name.to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn missing_section_is_missing_configuration() {
        let err = ConfigResolver::resolve(&Config::default()).unwrap_err();
        assert!(matches!(err, ShipError::MissingConfiguration));
    }

    #[test]
    fn defaults_are_filled_in() {
        let resolved = ConfigResolver::resolve(&config_named("x")).unwrap();

        assert_eq!(resolved.docker.image, DEFAULT_IMAGE);
        assert_eq!(resolved.docker.image_port, 80);
        assert_eq!(resolved.docker.image_frontend_server, DEFAULT_FRONTEND_IMAGE);
        assert_eq!(resolved.docker.bind, "0.0.0.0");
        assert!(resolved.ssl.is_none());
        assert_eq!(resolved.nginx.client_upload_limit, "10M");
        assert_eq!(resolved.log.opts["max-size"], "100m");
        assert_eq!(resolved.log.opts["max-file"], 10);
        assert_eq!(resolved.log.opts.len(), 2);
        assert_eq!(resolved.deploy_check_wait_time, 60);
        assert_eq!(resolved.app_port(), 80);
        assert!(!resolved.use_local_mongo);
    }

    #[test]
    fn legacy_docker_image_is_migrated() {
        let mut config = config_named("x");
        config.meteor.as_mut().unwrap().docker_image = Some("foo".to_string());

        let resolved = ConfigResolver::resolve(&config).unwrap();
        assert_eq!(resolved.docker.image, "foo");

        let json = serde_json::to_value(&resolved).unwrap();
        assert!(json.get("docker_image").is_none());
        assert_eq!(json["docker"]["image"], "foo");
    }

    #[test]
    fn explicit_docker_image_wins_over_legacy() {
        let mut config = config_named("x");
        let meteor = config.meteor.as_mut().unwrap();
        meteor.docker_image = Some("legacy".to_string());
        meteor.docker = Some(DockerConfig {
            image: Some("modern".to_string()),
            ..Default::default()
        });

        let resolved = ConfigResolver::resolve(&config).unwrap();
        assert_eq!(resolved.docker.image, "modern");
    }

    #[test]
    fn legacy_frontend_image_is_migrated() {
        let mut config = config_named("x");
        config.meteor.as_mut().unwrap().docker_image_frontend_server =
            Some("custom/frontend".to_string());

        let resolved = ConfigResolver::resolve(&config).unwrap();
        assert_eq!(resolved.docker.image_frontend_server, "custom/frontend");
    }

    #[test]
    fn legacy_frontend_image_overrides_docker_section() {
        let mut config = config_named("x");
        let meteor = config.meteor.as_mut().unwrap();
        meteor.docker_image_frontend_server = Some("legacy/frontend".to_string());
        meteor.docker = Some(DockerConfig {
            image_frontend_server: Some("new/frontend".to_string()),
            ..Default::default()
        });

        let resolved = ConfigResolver::resolve(&config).unwrap();
        assert_eq!(resolved.docker.image_frontend_server, "legacy/frontend");
    }

    #[test]
    fn bind_and_upload_limit_overrides_are_kept() {
        let mut config = config_named("x");
        let meteor = config.meteor.as_mut().unwrap();
        meteor.docker = Some(DockerConfig {
            bind: Some("127.0.0.1".to_string()),
            image_port: Some(3000),
            ..Default::default()
        });
        meteor.nginx = Some(NginxConfig {
            client_upload_limit: Some("50M".to_string()),
        });

        let resolved = ConfigResolver::resolve(&config).unwrap();
        assert_eq!(resolved.docker.bind, "127.0.0.1");
        assert_eq!(resolved.docker.image_port, 3000);
        assert_eq!(resolved.nginx.client_upload_limit, "50M");
    }

    #[test]
    fn ssl_port_defaults_only_when_ssl_present() {
        let mut config = config_named("x");
        config.meteor.as_mut().unwrap().ssl = Some(SslConfig::default());

        let ssl = ConfigResolver::resolve(&config).unwrap().ssl.unwrap();
        assert_eq!(ssl.port, 443);
        assert!(ssl.upload);
        assert!(!ssl.is_fully_automatic());
    }

    #[test]
    fn only_a_table_makes_ssl_fully_automatic() {
        let ssl_with = |autogenerate: serde_json::Value| {
            let mut config = config_named("x");
            config.meteor.as_mut().unwrap().ssl = Some(SslConfig {
                autogenerate: Some(autogenerate),
                ..Default::default()
            });
            ConfigResolver::resolve(&config).unwrap().ssl.unwrap()
        };

        assert!(ssl_with(serde_json::json!({"email": "a@b.c"})).is_fully_automatic());
        assert!(!ssl_with(serde_json::json!(true)).is_fully_automatic());
        assert!(!ssl_with(serde_json::json!("yes")).is_fully_automatic());
    }

    #[test]
    fn ssl_upload_false_is_kept() {
        let mut config = config_named("x");
        config.meteor.as_mut().unwrap().ssl = Some(SslConfig {
            upload: Some(false),
            port: Some(8443),
            ..Default::default()
        });

        let ssl = ConfigResolver::resolve(&config).unwrap().ssl.unwrap();
        assert!(!ssl.upload);
        assert_eq!(ssl.port, 8443);
    }

    #[test]
    fn resolving_does_not_touch_the_input() {
        let mut config = config_named("x");
        config.meteor.as_mut().unwrap().docker_image = Some("foo".to_string());

        let first = ConfigResolver::resolve(&config).unwrap();
        let second = ConfigResolver::resolve(&config).unwrap();

        assert_eq!(first, second);
        let meteor = config.meteor.as_ref().unwrap();
        assert_eq!(meteor.docker_image.as_deref(), Some("foo"));
        assert!(meteor.docker.is_none());
        assert!(meteor.log.is_none());
    }

    #[test]
    fn mongo_section_enables_local_mongo() {
        let mut config = config_named("x");
        config.mongo = Some(Default::default());
        assert!(ConfigResolver::resolve(&config).unwrap().use_local_mongo);
    }

    #[test]
    fn deploy_check_port_falls_back_to_env_port() {
        let mut config = config_named("x");
        config
            .meteor
            .as_mut()
            .unwrap()
            .env
            .insert("PORT".to_string(), "3000".to_string());

        let resolved = ConfigResolver::resolve(&config).unwrap();
        assert_eq!(resolved.app_port(), 3000);
        assert_eq!(resolved.deploy_check_port(), 3000);

        config.meteor.as_mut().unwrap().deploy_check_port = Some(8080);
        let resolved = ConfigResolver::resolve(&config).unwrap();
        assert_eq!(resolved.deploy_check_port(), 8080);
    }

    #[test]
    fn invalid_port_is_rejected() {
        let mut config = config_named("x");
        config
            .meteor
            .as_mut()
            .unwrap()
            .env
            .insert("PORT".to_string(), "http".to_string());

        assert!(matches!(
            ConfigResolver::resolve(&config),
            Err(ShipError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn empty_or_unsafe_names_are_rejected() {
        for name in ["", "my app", "app;rm", "../app"] {
            assert!(
                ConfigResolver::resolve(&config_named(name)).is_err(),
                "name {:?} should be rejected",
                name
            );
        }
        assert!(ConfigResolver::resolve(&config_named("my-app_2.0")).is_ok());
    }
}
