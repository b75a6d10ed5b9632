//! Electric vehicle listing for wallbox appliances.

use tabled::Tabled;

use sae_api::{ApplianceClient, Control, EvStatus};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct EvRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "SOC (manual)")]
    soc_manual: String,
}

impl From<&EvStatus> for EvRow {
    fn from(ev: &EvStatus) -> Self {
        Self {
            id: ev.id,
            name: ev.name.clone(),
            soc_manual: ev
                .soc_manual
                .map_or_else(|| "-".into(), |soc| format!("{soc}%")),
        }
    }
}

pub async fn handle(
    client: &ApplianceClient,
    id: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let control = client
        .get_control(id)
        .await
        .map_err(util::for_appliance(id))?;

    if !matches!(control, Control::ElectricVehicleCharger(_)) {
        return Err(CliError::Validation {
            field: "appliance".into(),
            reason: format!(
                "{id} is not controlled by an EV charger (control: {})",
                control.kind()
            ),
        });
    }

    let statuses = control.ev_statuses();
    let out = output::render_list(
        &global.output,
        &statuses,
        |ev| EvRow::from(ev),
        |ev| ev.id.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
