use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::debug;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BASE_URL: &str = "https://opendata.cwa.gov.tw";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const API_KEY_ENV: &str = "CWA_API_KEY";
pub const PORT_ENV: &str = "PORT";
pub const BASE_URL_ENV: &str = "CWA_BASE_URL";
pub const TIMEOUT_SECS_ENV: &str = "CWA_TIMEOUT_SECS";

/// Process-wide settings, built once at startup.
///
/// Example TOML:
/// api_key = "CWA-..."
/// port = 8080
/// timeout_secs = 5
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Credential for the upstream API. Queries fail fast while unset.
    pub api_key: Option<String>,
    pub port: u16,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            port: DEFAULT_PORT,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load the config file (explicit path or the platform default), then
    /// apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_layered(path, Self::config_file_path(), unicode_env(std::env::vars_os()))
    }

    /// An explicit path must be readable if present; without one, the platform
    /// default is optional and an unknown config dir means defaults.
    fn load_layered(
        explicit: Option<&Path>,
        default_path: Option<PathBuf>,
        env: Vec<(String, String)>,
    ) -> Result<Self> {
        let cfg = match (explicit, default_path) {
            (Some(path), _) => Self::from_file(path)?,
            (None, Some(path)) => Self::from_file(&path)?,
            (None, None) => {
                debug!("no platform config directory; using defaults and environment only");
                Self::default()
            }
        };

        Ok(cfg.with_env_pairs(env))
    }

    /// Read a TOML config file; a missing file yields defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Default config file under the platform config dir, if one exists.
    pub fn config_file_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "weather-task", "weather-server")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Override fields from environment-style pairs. Blank or unparsable values
    /// are ignored.
    pub fn with_env_pairs<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: HashMap<String, String> =
            pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect();

        if let Some(key) = non_blank(&map, API_KEY_ENV) {
            self.api_key = Some(key.to_string());
        }
        if let Some(port) = non_blank(&map, PORT_ENV).and_then(|v| v.parse().ok()) {
            self.port = port;
        }
        if let Some(url) = non_blank(&map, BASE_URL_ENV) {
            self.base_url = url.to_string();
        }
        if let Some(secs) = non_blank(&map, TIMEOUT_SECS_ENV)
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
        {
            self.timeout_secs = secs;
        }

        self
    }

    /// Configured API key, treating a blank value as absent.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|key| !key.is_empty())
    }

    pub fn is_api_key_configured(&self) -> bool {
        self.api_key().is_some()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Keep only variables whose name and value are valid Unicode.
fn unicode_env<I>(vars: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
        .collect()
}

fn non_blank<'a>(map: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    map.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}
