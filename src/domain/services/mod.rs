//! Domain Services
//!
//! Pure deployment logic: resolving configuration, building task lists and
//! planning per-host dispatches. No I/O happens here.

mod fanout;
mod resolver;
mod task_builder;

pub use fanout::{HostRegistration, SessionFanout, REGISTRATION_TITLE};
pub use resolver::{
    ConfigResolver, ResolvedConfig, ResolvedDocker, ResolvedNginx, ResolvedSsl, DEFAULT_APP_PORT,
    DEFAULT_BIND, DEFAULT_CLIENT_UPLOAD_LIMIT, DEFAULT_DEPLOY_CHECK_WAIT_TIME,
    DEFAULT_FRONTEND_IMAGE, DEFAULT_IMAGE, DEFAULT_IMAGE_PORT, DEFAULT_SSL_PORT,
};
pub use task_builder::{environment_for, LogsOptions, TaskListBuilder, SETTINGS_ENV_KEY};
