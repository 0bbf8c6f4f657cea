//! App Builder Port
//!
//! Compiles the application source into `bundle.tar.gz` inside a build
//! location.

use std::path::Path;

use crate::config::BuildOptions;
use crate::domain::value_objects::BuildLocation;
use crate::error::ShipResult;

pub trait AppBuilder: Send + Sync {
    /// Build `app_path` so that `location.bundle_path()` exists afterwards
    fn build(
        &self,
        app_path: &Path,
        location: &BuildLocation,
        options: &BuildOptions,
        verbose: bool,
    ) -> ShipResult<()>;
}

impl<T: AppBuilder + ?Sized> AppBuilder for &T {
    fn build(
        &self,
        app_path: &Path,
        location: &BuildLocation,
        options: &BuildOptions,
        verbose: bool,
    ) -> ShipResult<()> {
        (**self).build(app_path, location, options, verbose)
    }
}
