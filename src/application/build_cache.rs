//! Build cache
//!
//! Decides whether the push stage invokes the local bundler or reuses the
//! bundle left behind by a previous build at the same location.
//!
//! Two invocations for the same app path share one build location; running
//! them concurrently is up to the caller to avoid.

use std::path::{Path, PathBuf};

use crate::config::BuildOptions;
use crate::domain::entities::BuildArtifact;
use crate::domain::ports::{AppBuilder, DeployEventSink, PipelineEvent};
use crate::domain::value_objects::BuildLocation;
use crate::error::{ShipError, ShipResult};
use crate::fs::resolve_path;

/// Everything needed to produce (or find) the bundle
#[derive(Debug, Clone)]
pub struct BuildRequest {
    pub app_path: PathBuf,
    pub location: BuildLocation,
    pub options: BuildOptions,
    /// Reuse the previous bundle instead of building
    pub cached_build: bool,
    pub verbose: bool,
}

pub struct BuildCache;

impl BuildCache {
    /// `build_options.build_location` when set (relative to `base_path`),
    /// otherwise the location derived from the app path
    pub fn location_for(app_path: &Path, options: &BuildOptions, base_path: &Path) -> BuildLocation {
        match &options.build_location {
            Some(explicit) => BuildLocation::explicit(resolve_path(base_path, explicit)),
            None => BuildLocation::derive(app_path),
        }
    }

    pub fn prepare<B: AppBuilder + ?Sized>(
        builder: &B,
        request: &BuildRequest,
        events: &dyn DeployEventSink,
    ) -> ShipResult<BuildArtifact> {
        if request.cached_build {
            let artifact = BuildArtifact::at(request.location.clone());
            if !artifact.exists {
                return Err(ShipError::BuildCacheMiss {
                    bundle_path: artifact.bundle_path,
                });
            }
            tracing::info!("reusing bundle at {}", artifact.bundle_path.display());
            events.on_event(PipelineEvent::BuildReused {
                build_location: request.location.path().to_path_buf(),
            });
            return Ok(artifact);
        }

        events.on_event(PipelineEvent::BuildStarted {
            app_path: request.app_path.clone(),
        });
        tracing::info!(
            "building {} into {}",
            request.app_path.display(),
            request.location
        );
        builder.build(
            &request.app_path,
            &request.location,
            &request.options,
            request.verbose,
        )?;

        let artifact = BuildArtifact::at(request.location.clone());
        if !artifact.exists {
            return Err(ShipError::BuildFailed(format!(
                "bundler finished but {} is missing",
                artifact.bundle_path.display()
            )));
        }
        Ok(artifact)
    }
}
