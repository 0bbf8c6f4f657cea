//! Domain Layer
//!
//! The deployment core: pure decisions about what to run where, without
//! touching hosts or the local bundler.
//!
//! ## Structure
//!
//! - `entities/` - Task lists, sessions, build artifacts
//! - `value_objects/` - Build locations and pipeline stages
//! - `services/` - ConfigResolver, TaskListBuilder, SessionFanout
//! - `ports/` - Interfaces for the execution engine, builder and event sinks
//!
//! ## Design Principles
//!
//! 1. **No remote I/O** - Hosts are only reached through `ExecutionEngine`
//! 2. **Pure Functions** - Services borrow their input and return new values
//! 3. **Ports & Adapters** - Infrastructure plugs in through trait-defined ports

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
