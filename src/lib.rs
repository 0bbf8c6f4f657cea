//! mupship - Meteor deployment pipeline
//!
//! Turns a declarative deployment configuration into ordered, host-aware
//! remote actions: build the bundle locally, upload it, write the runtime
//! configuration on each host, then start and verify the app.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod fs;
pub mod infrastructure;
pub mod logging;

// Re-exports for convenience
pub use application::{CommandContext, MeteorCommands, StagePipeline};
pub use config::{Config, DeploymentConfig};
pub use domain::services::{ConfigResolver, ResolvedConfig, SessionFanout, TaskListBuilder};
pub use domain::value_objects::{BuildLocation, Stage};
pub use error::{ShipError, ShipResult};
