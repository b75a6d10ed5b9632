//! Configuration for SAE tools.
//!
//! TOML profiles naming SAE installations, layered with `SAE_` environment
//! variables, and translation into a `sae_api::ClientConfig`. The CLI adds
//! flag-aware wrappers on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use sae_api::endpoint::{DEFAULT_CONTEXT_PATH, DEFAULT_PORT};
use sae_api::{ApiEndpoint, ClientConfig, TransportConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is given on the command line.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named SAE installations, kept sorted by name.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default)]
    pub insecure: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timeout: default_timeout(),
            insecure: false,
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}

/// One SAE installation.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// Host name or IP address of the machine running SAE.
    pub host: String,

    /// `http` or `https`.
    #[serde(default = "default_scheme")]
    pub scheme: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_context_path")]
    pub context_path: String,

    /// Override the default TLS leniency.
    pub insecure: Option<bool>,

    /// Override the default timeout.
    pub timeout: Option<u64>,
}

impl Profile {
    pub fn for_host(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            scheme: default_scheme(),
            port: default_port(),
            context_path: default_context_path(),
            insecure: None,
            timeout: None,
        }
    }
}

fn default_scheme() -> String {
    "http".into()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_context_path() -> String {
    DEFAULT_CONTEXT_PATH.into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("de", "avanux", "sae").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("sae");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from `path` + environment. A missing file yields the defaults.
///
/// Environment variables use the `SAE_` prefix with `__` between nesting
/// levels, e.g. `SAE_DEFAULTS__TIMEOUT=5` or `SAE_PROFILES__HOME__HOST=raspi`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SAE_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if it can't be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, to_toml(cfg)?)?;
    Ok(())
}

/// Render `cfg` as it would be written to the config file.
pub fn to_toml(cfg: &Config) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(cfg)?)
}

// ── Client config ───────────────────────────────────────────────────

/// Build a `ClientConfig` from a profile, filling gaps from `defaults`.
pub fn profile_to_client_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<ClientConfig, ConfigError> {
    validate_profile(profile)?;

    let endpoint = ApiEndpoint::for_host(profile.host.trim())
        .with_scheme(profile.scheme.as_str())
        .with_port(profile.port)
        .with_context_path(profile.context_path.as_str());

    let transport = TransportConfig::default()
        .with_timeout(Duration::from_secs(
            profile.timeout.unwrap_or(defaults.timeout),
        ))
        .with_accept_invalid_certs(profile.insecure.unwrap_or(defaults.insecure));

    Ok(ClientConfig {
        endpoint,
        transport,
    })
}

fn validate_profile(profile: &Profile) -> Result<(), ConfigError> {
    if profile.host.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "host".into(),
            reason: "must not be empty".into(),
        });
    }
    if !matches!(profile.scheme.as_str(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "scheme".into(),
            reason: format!("expected 'http' or 'https', got '{}'", profile.scheme),
        });
    }
    if profile.port == 0 {
        return Err(ConfigError::Validation {
            field: "port".into(),
            reason: "must be between 1 and 65535".into(),
        });
    }
    Ok(())
}
