//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod build_location;
mod stage;

pub use build_location::BuildLocation;
pub use stage::Stage;
