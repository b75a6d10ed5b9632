//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

fn invalid(field: &str, reason: &str) -> CliError {
    CliError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

/// Set one profile key from its string form.
fn set_profile_key(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "host" => profile.host = value,
        "scheme" => {
            if !matches!(value.as_str(), "http" | "https") {
                return Err(invalid("scheme", "must be 'http' or 'https'"));
            }
            profile.scheme = value;
        }
        "port" => {
            profile.port = value
                .parse()
                .ok()
                .filter(|p| *p != 0)
                .ok_or_else(|| invalid("port", "must be a number between 1 and 65535"))?;
        }
        "context_path" | "context-path" => profile.context_path = value,
        "insecure" => {
            profile.insecure = Some(
                value
                    .parse()
                    .map_err(|_| invalid("insecure", "must be 'true' or 'false'"))?,
            );
        }
        "timeout" => {
            profile.timeout = Some(
                value
                    .parse()
                    .map_err(|_| invalid("timeout", "must be a number (seconds)"))?,
            );
        }
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!(
                    "unknown config key '{other}'. Valid keys: host, scheme, port, \
                     context_path, insecure, timeout"
                ),
            });
        }
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let text = config::to_toml(&cfg)?;
            let out = output::render_single(&global.output, &cfg, |_| text.clone(), |_| {
                "config".into()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }

        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);

            let profile = cfg
                .profiles
                .entry(profile_name.clone())
                .or_insert_with(|| Profile::for_host(""));
            set_profile_key(profile, &key, value)?;

            config::save_config(&cfg)?;
            output::status(&format!("✓ Set {key} on profile '{profile_name}'"), global.quiet);
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: sae config set host <host>");
            } else {
                for name in cfg.profiles.keys() {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();

            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name,
                });
            }

            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            output::status(&format!("✓ Default profile set to '{name}'"), global.quiet);
            Ok(())
        }
    }
}
