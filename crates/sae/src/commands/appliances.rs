//! Appliance command handlers.

use tabled::Tabled;

use sae_api::{ApplianceClient, ApplianceHeader, ApplianceInfo};

use crate::cli::{AppliancesArgs, AppliancesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ApplianceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Vendor")]
    vendor: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Controllable")]
    controllable: String,
}

impl ApplianceRow {
    fn new(h: &ApplianceHeader, color: bool) -> Self {
        Self {
            id: h.id.clone(),
            name: h.name.clone(),
            vendor: h.vendor.clone().unwrap_or_default(),
            kind: h.appliance_type.clone(),
            controllable: output::flag(h.controllable, color),
        }
    }
}

fn seconds(value: Option<u32>) -> String {
    value.map_or_else(|| "-".into(), |v| format!("{v}s"))
}

fn watts(value: Option<u32>) -> String {
    value.map_or_else(|| "-".into(), |v| format!("{v} W"))
}

fn detail(a: &ApplianceInfo) -> String {
    let mut lines = vec![
        format!("ID:            {}", a.id),
        format!("Name:          {}", a.name),
        format!("Vendor:        {}", a.vendor.as_deref().unwrap_or("-")),
        format!("Type:          {}", a.appliance_type),
        format!("Serial:        {}", a.serial.as_deref().unwrap_or("-")),
        format!("Max power:     {}", watts(a.max_power_consumption)),
    ];
    if let Some(min) = a.min_power_consumption {
        lines.push(format!("Min power:     {min} W"));
    }
    if let Some(ref method) = a.current_power_method {
        lines.push(format!("Power method:  {method}"));
    }
    lines.push(format!(
        "Interruptible: {}",
        output::flag(a.interruptions_allowed, false)
    ));
    if a.interruptions_allowed {
        lines.push(format!(
            "On time:       {} .. {}",
            seconds(a.min_on_time),
            seconds(a.max_on_time)
        ));
        lines.push(format!(
            "Off time:      {} .. {}",
            seconds(a.min_off_time),
            seconds(a.max_off_time)
        ));
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &ApplianceClient,
    args: AppliancesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        AppliancesCommand::List => {
            let headers = client.list_appliance_headers().await?;
            let color = output::should_color(&global.color);
            let out = output::render_list(
                &global.output,
                &headers,
                |h| ApplianceRow::new(h, color),
                |h| h.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AppliancesCommand::Get { id } => {
            let info = client
                .get_appliance_info(&id)
                .await
                .map_err(util::for_appliance(&id))?;
            let out = output::render_single(&global.output, &info, detail, |a| a.id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AppliancesCommand::Save { file, create } => {
            let info: ApplianceInfo = util::read_json_file(&file)?;
            if info.id.trim().is_empty() {
                return Err(CliError::Validation {
                    field: "id".into(),
                    reason: "appliance id must not be empty".into(),
                });
            }
            client.save_appliance_info(&info, create).await?;
            let verb = if create { "created" } else { "saved" };
            output::status(&format!("Appliance {} {verb}", info.id), global.quiet);
            Ok(())
        }

        AppliancesCommand::Delete { id } => {
            if !util::confirm(&format!("Delete appliance {id}?"), global.yes)? {
                return Ok(());
            }
            client
                .delete_appliance(&id)
                .await
                .map_err(util::for_appliance(&id))?;
            output::status(&format!("Appliance {id} deleted"), global.quiet);
            Ok(())
        }
    }
}
