//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `ssh/` - Execution engine over ssh/scp, template rendering
//! - `meteor_build` - Local bundler
//! - `events/` - Console and JSON event sinks

pub mod events;
pub mod meteor_build;
pub mod ssh;

// Re-export for convenience
pub use events::{ConsoleEventSink, JsonEventSink};
pub use meteor_build::MeteorBuilder;
pub use ssh::SshEngine;
