//! Build Location Value Object
//!
//! Derives the local directory the bundler writes into from the application
//! path. The derivation is a pure function of the path so that a later
//! `--cached-build` run finds the archive a previous run produced.

use std::fmt;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use uuid::{Builder, Uuid};

/// Local build output directory for one application path
///
/// Two invocations against the same application path share this directory
/// and therefore the same `bundle.tar.gz`. Running them concurrently is not
/// guarded here; callers must serialize builds per application.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BuildLocation(PathBuf);

impl BuildLocation {
    /// Directory name prefix marking build outputs under the temp dir
    pub const PREFIX: &'static str = "mup-meteor-";

    /// Archive file name produced inside the build location
    pub const BUNDLE_FILE: &'static str = "bundle.tar.gz";

    /// Derive the build location for `app_path` under the system temp directory
    pub fn derive(app_path: &Path) -> Self {
        Self::derive_in(&std::env::temp_dir(), app_path)
    }

    /// Derive the build location for `app_path` under `temp_root`
    pub fn derive_in(temp_root: &Path, app_path: &Path) -> Self {
        let id = Self::fingerprint(app_path);
        Self(temp_root.join(format!("{}{}", Self::PREFIX, id.hyphenated())))
    }

    /// Use an explicit, user supplied location
    pub fn explicit(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// Version-4 layout identifier whose random bits come from a SHA-256 of the path.
    ///
    /// 122 of the 128 bits are digest bits; the remaining six carry the
    /// version and variant markers.
    pub fn fingerprint(app_path: &Path) -> Uuid {
        let digest = Sha256::digest(app_path.to_string_lossy().as_bytes());
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&digest[..16]);
        Builder::from_random_bytes(bytes).into_uuid()
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Path of the bundle archive inside this location
    pub fn bundle_path(&self) -> PathBuf {
        self.0.join(Self::BUNDLE_FILE)
    }
}

impl fmt::Display for BuildLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl AsRef<Path> for BuildLocation {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}
