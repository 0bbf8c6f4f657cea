//! Domain Entities
//!
//! - `Task` / `TaskList` - remote actions for one command
//! - `Session` - an execution context bound to one host
//! - `BuildArtifact` - the bundle archive produced (or reused) locally

mod artifact;
mod session;
mod task;

pub use artifact::BuildArtifact;
pub use session::Session;
pub use task::{Task, TaskList, TaskVars};
