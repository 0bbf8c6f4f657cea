//! Meteor Module
//!
//! The commands of the meteor deployment: setup, push, envconfig, start,
//! stop, logs, and the deploy pipeline chaining push → envconfig → start.
//!
//! ## Structure
//!
//! - `options` - Command inputs (`CommandContext`)
//! - `use_case` - Command logic (`MeteorCommands`)
//!
//! ## Usage
//!
//! ```ignore
//! use mupship::application::{CommandContext, MeteorCommands};
//!
//! let commands = MeteorCommands::new(engine, builder);
//! commands.deploy(&CommandContext::new(config, base_path, assets_dir))?;
//! ```

mod options;
mod use_case;

pub use options::CommandContext;
pub use use_case::MeteorCommands;
