//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod app_builder;
pub mod deploy_events;
pub mod execution_engine;

pub use app_builder::AppBuilder;
pub use deploy_events::{DeployEventSink, NoopEventSink, PipelineEvent};
pub use execution_engine::{CommandOutput, ExecutionEngine, RunOptions, RunReport};
