//! Settings command handlers.

use sae_api::{ApplianceClient, Settings, SettingsDefaults};

use crate::cli::{GlobalOpts, SettingsArgs, SettingsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

fn detail(s: &Settings) -> String {
    let mut lines = vec![
        format!("Holidays:     {}", output::flag(s.holidays_enabled, false)),
        format!("Holidays URL: {}", s.holidays_url.as_deref().unwrap_or("-")),
    ];
    for m in &s.modbus_settings {
        lines.push(format!(
            "Modbus/TCP:   {} -> {}:{}",
            m.modbus_tcp_id,
            m.modbus_tcp_host.as_deref().unwrap_or("-"),
            m.modbus_tcp_port
                .map_or_else(|| "-".into(), |p| p.to_string())
        ));
    }
    if !s.extra.is_empty() {
        let mut keys: Vec<_> = s.extra.keys().map(String::as_str).collect();
        keys.sort_unstable();
        lines.push(format!("Other:        {}", keys.join(", ")));
    }
    lines.join("\n")
}

fn defaults_detail(d: &SettingsDefaults) -> String {
    [
        format!("Holidays URL:    {}", d.holidays_url.as_deref().unwrap_or("-")),
        format!("Modbus/TCP host: {}", d.modbus_tcp_host.as_deref().unwrap_or("-")),
        format!(
            "Modbus/TCP port: {}",
            d.modbus_tcp_port
                .map_or_else(|| "-".into(), |p| p.to_string())
        ),
    ]
    .join("\n")
}

pub async fn handle(
    client: &ApplianceClient,
    args: SettingsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SettingsCommand::Defaults => {
            let defaults = client.get_settings_defaults().await?;
            let out =
                output::render_single(&global.output, &defaults, defaults_detail, |_| {
                    "settingsdefaults".into()
                })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SettingsCommand::Get => {
            let settings = client.get_settings().await?;
            let out = output::render_single(&global.output, &settings, detail, |_| {
                "settings".into()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SettingsCommand::Set { file } => {
            let settings: Settings = util::read_json_file(&file)?;
            client.save_settings(&settings).await?;
            output::status("Settings saved", global.quiet);
            Ok(())
        }
    }
}
