//! Configuration loading.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag; must exist)
//! 2. `~/.geogate/config.toml` (user)
//! 3. `/etc/geogate/config.toml` (system)
//! 4. built-in defaults
//!
//! Environment variables override whatever the file says:
//! `GEOGATE_UPSTREAM_URL`, `GEOGATE_CACHE_TTL` (seconds) and
//! `GEOGATE_TIMEOUT_SECS`.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::upstream::{DEFAULT_BASE_URL, DEFAULT_PATH, DEFAULT_TIMEOUT};
use crate::{GeoGateError, Result};

pub const ENV_UPSTREAM_URL: &str = "GEOGATE_UPSTREAM_URL";
pub const ENV_CACHE_TTL: &str = "GEOGATE_CACHE_TTL";
pub const ENV_TIMEOUT_SECS: &str = "GEOGATE_TIMEOUT_SECS";

/// Gateway configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub cache: CacheSection,
}

/// Downstream compute service.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL (default: http://localhost:8000).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path appended to the base URL (default: /process).
    #[serde(default = "default_path")]
    pub path: String,
    /// Per-call deadline in seconds (default: 5).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            path: default_path(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_path() -> String {
    DEFAULT_PATH.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

/// Result cache settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSection {
    /// Entry time-to-live in seconds (default: 60).
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,
    /// Maximum number of entries (default: 10,000).
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl(),
            max_entries: default_max_entries(),
        }
    }
}

fn default_ttl() -> u64 {
    60
}

fn default_max_entries() -> u64 {
    10_000
}

impl GatewayConfig {
    /// Load configuration from the standard locations, then apply
    /// environment overrides.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a config file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            GeoGateError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            GeoGateError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path. `None` means use defaults.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(GeoGateError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".geogate").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/geogate/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }

    /// Apply environment-style overrides through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_UPSTREAM_URL) {
            self.upstream.base_url = url;
        }
        if let Some(ttl) = lookup(ENV_CACHE_TTL) {
            self.cache.ttl_secs = parse_secs(ENV_CACHE_TTL, &ttl)?;
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT_SECS) {
            self.upstream.timeout_secs = parse_secs(ENV_TIMEOUT_SECS, &timeout)?;
        }
        Ok(())
    }

    /// Reject values the gateway cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.cache.ttl_secs == 0 {
            return Err(GeoGateError::Configuration(
                "cache.ttl_secs must be greater than zero".to_string(),
            ));
        }
        if self.upstream.timeout_secs == 0 {
            return Err(GeoGateError::Configuration(
                "upstream.timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.upstream.timeout_secs)
    }
}

fn parse_secs(name: &str, raw: &str) -> Result<u64> {
    raw.trim()
        .parse()
        .map_err(|e| GeoGateError::Configuration(format!("Invalid {name} value {raw:?}: {e}")))
}
