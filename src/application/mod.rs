//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `MeteorCommands` - setup, push, envconfig, start, stop, logs and deploy
//!
//! ## Services
//!
//! - `BuildCache` - Build the bundle or reuse the previous one
//! - `StagePipeline` - Sequential stages with short-circuit on failure

pub mod build_cache;
pub mod meteor;
pub mod pipeline;

pub use build_cache::{BuildCache, BuildRequest};
pub use meteor::{CommandContext, MeteorCommands};
pub use pipeline::{PipelineReport, StagePipeline};
