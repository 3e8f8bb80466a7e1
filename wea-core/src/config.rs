use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::provider::{openweather, wikipedia};

/// Environment variable overriding [`Config::serve_at`].
pub const ENV_SERVE_AT: &str = "WE_SERVE_AT";
/// Environment variable overriding [`OpenWeatherConfig::api_key`].
pub const ENV_OW_API_KEY: &str = "WE_OW_API_KEY";
/// Environment variable overriding [`LoggingConfig::level`].
pub const ENV_LOG: &str = "WE_LOG";

/// OpenWeather credentials and endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenWeatherConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_openweather_base_url")]
    pub base_url: String,
}

/// Wikipedia endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WikipediaConfig {
    #[serde(default = "default_wikipedia_base_url")]
    pub base_url: String,
}

/// Settings for the HTTP client shared by both providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds, enforced by the HTTP client.
    ///
    /// Independent of the caller's cancellation token: an expired timeout
    /// surfaces as [`crate::ProviderError::Other`], not `Canceled`. Callers
    /// wanting a deadline reported as cancellation cancel the token themselves.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u32,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset, e.g. "info" or "wea=debug".
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// serve_at = "127.0.0.1:8080"
///
/// [openweather]
/// api_key = "..."
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_serve_at")]
    pub serve_at: String,
    #[serde(default)]
    pub openweather: OpenWeatherConfig,
    #[serde(default)]
    pub wikipedia: WikipediaConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_serve_at() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_openweather_base_url() -> String {
    openweather::DEFAULT_BASE_URL.to_string()
}

fn default_wikipedia_base_url() -> String {
    wikipedia::DEFAULT_BASE_URL.to_string()
}

fn default_timeout_seconds() -> u32 {
    30
}

fn default_user_agent() -> String {
    concat!("wea/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for OpenWeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_openweather_base_url(),
        }
    }
}

impl Default for WikipediaConfig {
    fn default() -> Self {
        Self {
            base_url: default_wikipedia_base_url(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            serve_at: default_serve_at(),
            openweather: OpenWeatherConfig::default(),
            wikipedia: WikipediaConfig::default(),
            http: HttpConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load config from `path` (or the platform default location), or return
    /// defaults if the file doesn't exist yet.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = Self::resolve_path(path)?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to `path` (or the platform default location), creating
    /// parent directories as needed.
    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf> {
        let path = Self::resolve_path(path)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(path)
    }

    /// Path to the config file in the platform config directory.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "wea", "wea")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    fn resolve_path(path: Option<&Path>) -> Result<PathBuf> {
        match path {
            Some(path) => Ok(path.to_path_buf()),
            None => Self::config_file_path(),
        }
    }

    /// Apply `WE_*` overrides. `lookup` is usually `|k| std::env::var(k).ok()`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.is_empty());

        if let Some(serve_at) = lookup(ENV_SERVE_AT) {
            self.serve_at = serve_at;
        }
        if let Some(api_key) = lookup(ENV_OW_API_KEY) {
            self.openweather.api_key = Some(api_key);
        }
        if let Some(level) = lookup(ENV_LOG) {
            self.logging.level = level;
        }
    }

    pub fn set_openweather_api_key(&mut self, api_key: String) {
        self.openweather.api_key = Some(api_key);
    }

    /// Returns the OpenWeather API key, or an error explaining how to set one.
    pub fn openweather_api_key(&self) -> Result<&str> {
        self.openweather
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No OpenWeather API key configured.\n\
                     Hint: run `wea configure` or set {ENV_OW_API_KEY}."
                )
            })
    }
}
