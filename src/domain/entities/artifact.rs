//! Build artifact entity

use std::path::PathBuf;

use crate::domain::value_objects::BuildLocation;

/// Result of building the bundle, or of finding a previous build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildArtifact {
    pub build_location: BuildLocation,
    pub bundle_path: PathBuf,
    pub exists: bool,
}

impl BuildArtifact {
    /// Inspect `location` on disk
    pub fn at(location: BuildLocation) -> Self {
        let bundle_path = location.bundle_path();
        let exists = bundle_path.is_file();
        Self {
            build_location: location,
            bundle_path,
            exists,
        }
    }
}
