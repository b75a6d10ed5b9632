//! CLI error types with miette diagnostics.
//!
//! Maps `sae_api::Error` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use sae_config::ConfigError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to SAE at {url}")]
    #[diagnostic(
        code(sae::connection_failed),
        help(
            "Check that Smart Appliance Enabler is running and reachable.\n\
             URL: {url}\n\
             Try: sae appliances list --host <host>"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request timed out")]
    #[diagnostic(
        code(sae::timeout),
        help("Increase timeout with --timeout or check that the SAE host is responsive.")
    )]
    Timeout,

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(sae::not_found),
        help("Run: sae {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────

    #[error("SAE returned HTTP {status}")]
    #[diagnostic(code(sae::api_error), help("Response body: {body}"))]
    Api { status: u16, body: String },

    #[error("Unexpected response from SAE: {message}")]
    #[diagnostic(
        code(sae::invalid_response),
        help("The SAE version may not match this CLI. Re-run with -vv to see the request.")
    )]
    InvalidResponse { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(sae::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(sae::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: sae config set host <host> --profile {name}"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No SAE host configured")]
    #[diagnostic(
        code(sae::no_config),
        help(
            "Pass --host, set SAE_HOST, or run: sae config set host <host>\n\
             Config file: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(sae::config))]
    Config(Box<ConfigError>),

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(sae::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),

    #[error("YAML rendering failed: {0}")]
    #[diagnostic(code(sae::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::NotFound { .. } | Self::Api { status: 404, .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── Error mapping ────────────────────────────────────────────────────

impl From<sae_api::Error> for CliError {
    fn from(err: sae_api::Error) -> Self {
        match err {
            sae_api::Error::Transport(e) if e.is_timeout() => Self::Timeout,
            sae_api::Error::Transport(e) => Self::ConnectionFailed {
                url: e
                    .url()
                    .map_or_else(|| "(unknown)".into(), ToString::to_string),
                source: Box::new(e),
            },
            sae_api::Error::Server { status, body } => Self::Api { status, body },
            sae_api::Error::Deserialization { message, .. } => Self::InvalidResponse { message },
            sae_api::Error::Serialization(e) => Self::Json(e),
            sae_api::Error::InvalidUrl(e) => Self::Validation {
                field: "host".into(),
                reason: e.to_string(),
            },
            sae_api::Error::ClientBuild(reason) => Self::Validation {
                field: "transport".into(),
                reason,
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(Box::new(other)),
        }
    }
}
