//! Configuration and settings loading

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ShipError, ShipResult};
use crate::fs::absolutize;

use super::types::Config;

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "mup.toml";

/// Default settings file name, looked up next to the configuration file
pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";

/// Overrides the directory holding remote scripts and templates
pub const ASSETS_DIR_VAR: &str = "MUPSHIP_ASSETS_DIR";

/// Overrides the settings file path
pub const SETTINGS_VAR: &str = "MUPSHIP_SETTINGS";

/// A key in the configuration file that nothing reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    /// Dotted path of the key, e.g. `meteor.docker.imag`
    pub path: String,
    /// 1-based line where the key is assigned, when it can be found
    pub line: Option<usize>,
    /// Closest known key
    pub suggestion: Option<&'static str>,
}

impl ConfigWarning {
    fn new(path: String, content: &str) -> Self {
        let key = path.rsplit('.').next().unwrap_or(&path).to_string();
        Self {
            line: assignment_line(content, &key),
            suggestion: closest_known_key(&key),
            path,
        }
    }

    /// Last segment of the path
    pub fn key(&self) -> &str {
        self.path.rsplit('.').next().unwrap_or(&self.path)
    }
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a known setting", self.path)?;
        if let Some(line) = self.line {
            write!(f, " (line {})", line)?;
        }
        match self.suggestion {
            Some(known) => write!(f, "; did you mean '{}'?", known),
            None => Ok(()),
        }
    }
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> ShipResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;
    parse_with_warnings(&content, path)
}

/// Parse configuration text; `path` is only used in diagnostics.
pub fn parse_with_warnings(content: &str, path: &Path) -> ShipResult<(Config, Vec<ConfigWarning>)> {
    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| ShipError::ConfigParse {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|p| ConfigWarning::new(p, content))
        .collect();

    Ok((config, warnings))
}

/// Directory that relative paths in the configuration resolve against.
///
/// Always absolute, so `mup.toml` in two different projects never yields
/// the same app path.
pub fn base_path_of(config_path: &Path) -> PathBuf {
    let config_path = absolutize(config_path);
    match config_path.parent() {
        Some(parent) => parent.to_path_buf(),
        None => config_path,
    }
}

/// Where application settings come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsSource {
    /// Given explicitly; the file must exist
    Explicit(PathBuf),
    /// The default location; a missing file means `{}`
    Default(PathBuf),
}

impl SettingsSource {
    /// Pick the settings source: explicit flag, then `MUPSHIP_SETTINGS`, then the default file
    pub fn select(explicit: Option<PathBuf>, base_path: &Path) -> Self {
        explicit
            .or_else(|| std::env::var(SETTINGS_VAR).ok().map(PathBuf::from))
            .map(SettingsSource::Explicit)
            .unwrap_or_else(|| SettingsSource::Default(base_path.join(DEFAULT_SETTINGS_FILE)))
    }

    pub fn path(&self) -> &Path {
        match self {
            SettingsSource::Explicit(p) | SettingsSource::Default(p) => p,
        }
    }

    /// Read and parse the settings JSON
    pub fn load(&self) -> ShipResult<serde_json::Value> {
        let path = self.path();
        if let SettingsSource::Default(_) = self {
            if !path.exists() {
                tracing::debug!("no settings file at {}, using {{}}", path.display());
                return Ok(serde_json::Value::Object(serde_json::Map::new()));
            }
        }

        let content = fs::read_to_string(path).map_err(|e| ShipError::InvalidSettings {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| ShipError::InvalidSettings {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Directory holding remote scripts and templates.
///
/// `MUPSHIP_ASSETS_DIR` wins; otherwise the `assets/` directory shipped with the crate.
pub fn assets_dir() -> PathBuf {
    std::env::var(ASSETS_DIR_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/assets")))
}

/// Line of the first `key = ...` assignment
fn assignment_line(content: &str, key: &str) -> Option<usize> {
    content.lines().position(|line| {
        line.trim_start()
            .strip_prefix(key)
            .is_some_and(|rest| rest.trim_start().starts_with('='))
    })
    .map(|index| index + 1)
}

const KNOWN_KEYS: &[&str] = &[
    "servers",
    "host",
    "username",
    "pem",
    "port",
    "meteor",
    "mongo",
    "name",
    "path",
    "docker",
    "image",
    "image_frontend_server",
    "image_port",
    "bind",
    "args",
    "docker_image",
    "docker_image_frontend_server",
    "ssl",
    "crt",
    "key",
    "autogenerate",
    "upload",
    "env",
    "log",
    "opts",
    "nginx",
    "client_upload_limit",
    "volumes",
    "build_options",
    "build_location",
    "executable",
    "server_only",
    "debug",
    "enable_upload_progress_bar",
    "deploy_check_wait_time",
    "deploy_check_port",
];

/// Known key within two edits of `key`
fn closest_known_key(key: &str) -> Option<&'static str> {
    KNOWN_KEYS
        .iter()
        .map(|known| (*known, edit_distance(key, known)))
        .filter(|(_, distance)| *distance <= 2)
        .min_by_key(|(_, distance)| *distance)
        .map(|(known, _)| known)
}

/// Insertions, deletions and substitutions needed to turn `a` into `b`
fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitute = diagonal + usize::from(ca != *cb);
            diagonal = row[j + 1];
            row[j + 1] = substitute.min(row[j] + 1).min(diagonal + 1);
        }
    }
    row[b.len()]
}
