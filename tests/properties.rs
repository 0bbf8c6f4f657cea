//! Property tests for mupship.
//!
//! Run with: `cargo test --test properties`

#[path = "properties/build_location.rs"]
mod build_location;
