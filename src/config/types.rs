//! Configuration type definitions
//!
//! These mirror the TOML file one to one. Defaults are *not* filled in here;
//! that is the job of `domain::services::ConfigResolver`, which leaves the
//! loaded value untouched.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ShipResult;

use super::loader;

/// Whole configuration document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Connection details, keyed by server name
    #[serde(default)]
    pub servers: OrderedMap<HostConfig>,

    /// The deployment section; absence is reported by the resolver
    #[serde(default)]
    pub meteor: Option<DeploymentConfig>,

    /// Presence means a database container runs next to the app
    #[serde(default)]
    pub mongo: Option<MongoConfig>,
}

impl Config {
    /// Load from a TOML file, logging unknown keys as warnings
    pub fn load(path: &Path) -> ShipResult<Self> {
        let (config, warnings) = loader::load_with_warnings(path)?;
        for warning in &warnings {
            tracing::warn!("{}: {}", path.display(), warning);
        }
        Ok(config)
    }
}

/// How to reach one host over SSH
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostConfig {
    pub host: String,

    #[serde(default = "default_username")]
    pub username: String,

    #[serde(default)]
    pub pem: Option<PathBuf>,

    #[serde(default = "default_ssh_port")]
    pub port: u16,
}

fn default_username() -> String {
    "root".to_string()
}

fn default_ssh_port() -> u16 {
    22
}

/// Co-located database section. Only its presence matters to the app.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MongoConfig {
    #[serde(default)]
    pub version: Option<String>,
}

/// The `[meteor]` section as written by the user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeploymentConfig {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub path: PathBuf,

    #[serde(default)]
    pub docker: Option<DockerConfig>,

    /// Legacy spelling of `docker.image`
    #[serde(default)]
    pub docker_image: Option<String>,

    /// Legacy spelling of `docker.image_frontend_server`
    #[serde(default)]
    pub docker_image_frontend_server: Option<String>,

    #[serde(default)]
    pub ssl: Option<SslConfig>,

    #[serde(default, deserialize_with = "deserialize_env")]
    pub env: BTreeMap<String, String>,

    #[serde(default)]
    pub log: Option<LogConfig>,

    #[serde(default)]
    pub nginx: Option<NginxConfig>,

    /// Host path → container path
    #[serde(default)]
    pub volumes: BTreeMap<String, String>,

    #[serde(default)]
    pub build_options: BuildOptions,

    /// Per-server settings, in document order
    #[serde(default)]
    pub servers: OrderedMap<ServerConfig>,

    #[serde(default)]
    pub enable_upload_progress_bar: bool,

    #[serde(default)]
    pub deploy_check_wait_time: Option<u64>,

    #[serde(default)]
    pub deploy_check_port: Option<u16>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockerConfig {
    #[serde(default)]
    pub image: Option<String>,

    #[serde(default)]
    pub image_frontend_server: Option<String>,

    #[serde(default)]
    pub image_port: Option<u16>,

    #[serde(default)]
    pub bind: Option<String>,

    /// Extra `docker run` arguments
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SslConfig {
    #[serde(default)]
    pub crt: Option<PathBuf>,

    #[serde(default)]
    pub key: Option<PathBuf>,

    #[serde(default)]
    pub port: Option<u16>,

    /// Fully automatic certificates when this is a table; any other value
    /// keeps the SSL setup tasks
    #[serde(default)]
    pub autogenerate: Option<serde_json::Value>,

    /// `false` keeps whatever certificates are already on the host
    #[serde(default)]
    pub upload: Option<bool>,
}

/// Docker log driver options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default)]
    pub opts: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NginxConfig {
    #[serde(default)]
    pub client_upload_limit: Option<String>,
}

/// Options passed to the local bundler
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOptions {
    /// Overrides the derived build location
    #[serde(default)]
    pub build_location: Option<PathBuf>,

    /// Bundler executable (default `meteor`)
    #[serde(default)]
    pub executable: Option<String>,

    #[serde(default)]
    pub server_only: bool,

    #[serde(default)]
    pub debug: bool,
}

/// Per-server section under `meteor.servers`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default, deserialize_with = "deserialize_env")]
    pub env: BTreeMap<String, String>,
}

impl ServerConfig {
    pub fn server_host(&self) -> Option<&str> {
        self.env.get("SERVER_HOST").map(String::as_str)
    }
}

/// Scalar accepted as an environment value.
///
/// `PORT = 3000` and `PORT = "3000"` both end up as the string `"3000"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum EnvScalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl From<EnvScalar> for String {
    fn from(value: EnvScalar) -> Self {
        match value {
            EnvScalar::Str(s) => s,
            EnvScalar::Int(i) => i.to_string(),
            EnvScalar::Float(f) => f.to_string(),
            EnvScalar::Bool(b) => b.to_string(),
        }
    }
}

fn deserialize_env<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, EnvScalar>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(|(k, v)| (k, v.into())).collect())
}

/// String-keyed map that keeps document order.
///
/// Server tables are matched against sessions and registered one by one,
/// so the order the user wrote them in is preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedMap<V>(Vec<(String, V)>);

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert or replace, keeping the original position of a replaced key
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedMapVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
            type Value = OrderedMap<V>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a table of named entries")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = OrderedMap::new();
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    map.insert(key, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}
