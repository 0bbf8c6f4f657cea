//! Local bundler
//!
//! Runs `meteor build` for the server architecture, then packs the output
//! directory into `bundle.tar.gz` inside the build location.

use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::config::BuildOptions;
use crate::domain::ports::AppBuilder;
use crate::domain::value_objects::BuildLocation;
use crate::error::{ShipError, ShipResult};
use crate::fs::absolutize;

pub const DEFAULT_EXECUTABLE: &str = "meteor";
pub const ARCHITECTURE: &str = "os.linux.x86_64";

#[derive(Debug, Clone, Copy, Default)]
pub struct MeteorBuilder;

impl MeteorBuilder {
    /// Arguments passed to the bundler executable
    pub fn build_args(location: &BuildLocation, options: &BuildOptions) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "build".into(),
            "--directory".into(),
            location.path().into(),
            "--architecture".into(),
            ARCHITECTURE.into(),
        ];
        if options.server_only {
            args.push("--server-only".into());
        }
        if options.debug {
            args.push("--debug".into());
        }
        args
    }

    /// `location` anchored at the working directory when relative
    pub fn anchored(location: &BuildLocation) -> BuildLocation {
        BuildLocation::explicit(absolutize(location.path()))
    }

    fn run(mut cmd: Command, what: &str, verbose: bool) -> ShipResult<()> {
        if verbose {
            cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
        } else {
            cmd.stdout(Stdio::null()).stderr(Stdio::piped());
        }

        let output = cmd
            .output()
            .map_err(|e| ShipError::BuildFailed(format!("cannot run {}: {}", what, e)))?;
        if output.status.success() {
            return Ok(());
        }
        Err(ShipError::BuildFailed(format!(
            "{} exited with {}: {}",
            what,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )))
    }
}

impl AppBuilder for MeteorBuilder {
    fn build(
        &self,
        app_path: &Path,
        location: &BuildLocation,
        options: &BuildOptions,
        verbose: bool,
    ) -> ShipResult<()> {
        let executable = options.executable.as_deref().unwrap_or(DEFAULT_EXECUTABLE);
        // the bundler runs inside the app, tar inside the location
        let location = Self::anchored(location);
        std::fs::create_dir_all(location.path())?;

        tracing::info!("{} build in {}", executable, app_path.display());
        let mut build = Command::new(executable);
        build
            .current_dir(absolutize(app_path))
            .args(Self::build_args(&location, options));
        Self::run(build, executable, verbose)?;

        let mut archive = Command::new("tar");
        archive
            .current_dir(location.path())
            .args(["-czf", BuildLocation::BUNDLE_FILE, "bundle"]);
        Self::run(archive, "tar", verbose)
    }
}
