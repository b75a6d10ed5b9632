//! Control command handlers.

use sae_api::{ApplianceClient, ConfigChange, Control, ControlDefaults};

use crate::cli::{ControlArgs, GlobalOpts, RecordCommand};
use crate::error::CliError;
use crate::output;

use super::util;

fn opt<T: ToString>(value: Option<&T>) -> String {
    value.map_or_else(|| "-".into(), ToString::to_string)
}

fn detail(control: &Control) -> String {
    let mut lines = vec![format!("Type:     {}", control.kind())];
    match control {
        Control::Switch(s) => {
            lines.push(format!("GPIO:     {}", s.gpio));
            lines.push(format!("Reversed: {}", output::flag(s.reverse_states, false)));
        }
        Control::ModbusSwitch(m) => {
            lines.push(format!("Modbus:   {}", m.idref));
            lines.push(format!("Slave:    {}", m.slave_address));
            lines.push(format!("Register: {}", m.register_address));
        }
        Control::HttpSwitch(h) => {
            lines.push(format!("On URL:   {}", h.on_url));
            lines.push(format!("Off URL:  {}", h.off_url));
        }
        Control::ElectricVehicleCharger(c) => {
            lines.push(format!("Voltage:  {}", opt(c.voltage.as_ref())));
            lines.push(format!("Phases:   {}", opt(c.phases.as_ref())));
            lines.push(format!("Vehicles: {}", c.vehicles.len()));
        }
        Control::Other(_) => lines.push("Details:  not modelled, use -o json".into()),
        Control::AlwaysOnSwitch | Control::MockSwitch | Control::None => {}
    }
    lines.join("\n")
}

fn defaults_detail(d: &ControlDefaults) -> String {
    let ev = &d.electric_vehicle;
    let charger = &d.electric_vehicle_charger;
    [
        format!("Charger voltage:       {}", opt(charger.voltage.as_ref())),
        format!("Charger phases:        {}", opt(charger.phases.as_ref())),
        format!("Charger poll interval: {}", opt(charger.poll_interval.as_ref())),
        format!("EV battery capacity:   {} Wh", ev.battery_capacity),
        format!("EV phases:             {}", opt(ev.phases.as_ref())),
        format!("EV max charge power:   {}", opt(ev.max_charge_power.as_ref())),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &ApplianceClient,
    args: ControlArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        RecordCommand::Defaults => {
            let defaults = client.get_control_defaults().await?;
            let out =
                output::render_single(&global.output, &defaults, defaults_detail, |_| {
                    "controldefaults".into()
                })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RecordCommand::Get { id } => {
            let control = client
                .get_control(&id)
                .await
                .map_err(util::for_appliance(&id))?;
            // The empty record renders as `null` in structured formats
            let stored = (!control.is_empty()).then_some(&control);
            let out = output::render_single(
                &global.output,
                &stored,
                |c| c.map_or_else(|| format!("No control configured for {id}"), detail),
                |c| c.map_or_else(String::new, |c| c.kind().into()),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RecordCommand::Set { id, file } => {
            let control: Control = util::read_json_file(&file)?;
            client
                .update_control(&id, &control)
                .await
                .map_err(util::for_appliance(&id))?;
            output::status(
                &format!("Control of {id} set to {}", control.kind()),
                global.quiet,
            );
            Ok(())
        }

        RecordCommand::Delete { id } => {
            if !util::confirm(&format!("Delete control of {id}?"), global.yes)? {
                return Ok(());
            }
            client
                .save_or_delete_control(&id, ConfigChange::Delete)
                .await
                .map_err(util::for_appliance(&id))?;
            output::status(&format!("Control of {id} deleted"), global.quiet);
            Ok(())
        }
    }
}
