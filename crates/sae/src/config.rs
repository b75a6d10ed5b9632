//! CLI configuration: thin wrapper around `sae_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--host, --port, etc.).

use sae_api::ClientConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use sae_config::{
    Config, Profile, config_path, load_config_or_default, save_config, to_toml,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Comma-separated profile names, for error help text.
pub fn available_profiles(config: &Config) -> String {
    if config.profiles.is_empty() {
        return "(none)".into();
    }
    config
        .profiles
        .keys()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Apply global flag overrides on top of a profile.
///
/// Flags (and their `SAE_*` env fallbacks) take priority over profile values.
pub fn apply_overrides(profile: &Profile, global: &GlobalOpts) -> Profile {
    let mut p = profile.clone();
    if let Some(ref host) = global.host {
        p.host.clone_from(host);
    }
    if let Some(port) = global.port {
        p.port = port;
    }
    if let Some(ref scheme) = global.scheme {
        p.scheme.clone_from(scheme);
    }
    if global.insecure {
        p.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        p.timeout = Some(timeout);
    }
    p
}

/// Build a `ClientConfig` from the config file, active profile, and flags.
pub fn resolve_client_config(global: &GlobalOpts) -> Result<ClientConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    if let Some(profile) = cfg.profile(&profile_name) {
        let profile = apply_overrides(profile, global);
        return Ok(sae_config::profile_to_client_config(&profile, &cfg.defaults)?);
    }

    // An explicitly requested profile must exist
    if global.profile.is_some() {
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: available_profiles(&cfg),
        });
    }

    // No profile -- build from flags / env vars alone
    let host = global.host.as_deref().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;
    let profile = apply_overrides(&Profile::for_host(host), global);
    Ok(sae_config::profile_to_client_config(&profile, &cfg.defaults)?)
}
