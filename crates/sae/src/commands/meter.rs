//! Meter command handlers.

use sae_api::{ApplianceClient, ConfigChange, Meter, MeterDefaults};

use crate::cli::{GlobalOpts, MeterArgs, RecordCommand};
use crate::error::CliError;
use crate::output;

use super::util;

fn opt<T: ToString>(value: Option<&T>) -> String {
    value.map_or_else(|| "-".into(), ToString::to_string)
}

fn detail(meter: &Meter) -> String {
    let mut lines = vec![format!("Type:        {}", meter.kind())];
    match meter {
        Meter::S0ElectricityMeter(s0) => {
            lines.push(format!("GPIO:        {}", s0.gpio));
            lines.push(format!("Impulses:    {}/kWh", s0.impulses_per_kwh));
            lines.push(format!("Interval:    {}", opt(s0.measurement_interval.as_ref())));
        }
        Meter::ModbusElectricityMeter(m) => {
            lines.push(format!("Modbus:      {}", m.idref));
            lines.push(format!("Slave:       {}", m.slave_address));
            lines.push(format!("Register:    {}", m.register_address));
            lines.push(format!("Poll:        {}", opt(m.poll_interval.as_ref())));
        }
        Meter::HttpElectricityMeter(h) => {
            lines.push(format!("URL:         {}", h.url));
            lines.push(format!("Factor to W: {}", opt(h.factor_to_watt.as_ref())));
            lines.push(format!("Poll:        {}", opt(h.poll_interval.as_ref())));
            if let Some(ref path) = h.path {
                lines.push(format!("Path:        {path}"));
            }
        }
        Meter::Other(_) => lines.push("Details:     not modelled, use -o json".into()),
        Meter::None => {}
    }
    lines.join("\n")
}

fn defaults_detail(d: &MeterDefaults) -> String {
    let s0 = &d.s0_electricity_meter;
    let modbus = &d.modbus_electricity_meter;
    let http = &d.http_electricity_meter;
    [
        format!("S0 impulses/kWh:      {}", opt(s0.impulses_per_kwh.as_ref())),
        format!("S0 interval:          {}", opt(s0.measurement_interval.as_ref())),
        format!("Modbus poll interval: {}", opt(modbus.poll_interval.as_ref())),
        format!("HTTP factor to watt:  {}", opt(http.factor_to_watt.as_ref())),
        format!("HTTP poll interval:   {}", opt(http.poll_interval.as_ref())),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &ApplianceClient,
    args: MeterArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        RecordCommand::Defaults => {
            let defaults = client.get_meter_defaults().await?;
            let out =
                output::render_single(&global.output, &defaults, defaults_detail, |_| {
                    "meterdefaults".into()
                })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RecordCommand::Get { id } => {
            let meter = client
                .get_meter(&id)
                .await
                .map_err(util::for_appliance(&id))?;
            let stored = (!meter.is_empty()).then_some(&meter);
            let out = output::render_single(
                &global.output,
                &stored,
                |m| m.map_or_else(|| format!("No meter configured for {id}"), detail),
                |m| m.map_or_else(String::new, |m| m.kind().into()),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RecordCommand::Set { id, file } => {
            let meter: Meter = util::read_json_file(&file)?;
            client
                .update_meter(&id, &meter)
                .await
                .map_err(util::for_appliance(&id))?;
            output::status(
                &format!("Meter of {id} set to {}", meter.kind()),
                global.quiet,
            );
            Ok(())
        }

        RecordCommand::Delete { id } => {
            if !util::confirm(&format!("Delete meter of {id}?"), global.yes)? {
                return Ok(());
            }
            client
                .save_or_delete_meter(&id, ConfigChange::Delete)
                .await
                .map_err(util::for_appliance(&id))?;
            output::status(&format!("Meter of {id} deleted"), global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use sae_api::{HttpElectricityMeter, S0ElectricityMeter};

    use super::*;

    #[test]
    fn s0_detail() {
        let text = detail(&Meter::S0ElectricityMeter(S0ElectricityMeter {
            gpio: 22,
            pin_pull_resistance: None,
            impulses_per_kwh: 1000,
            measurement_interval: None,
            extra: HashMap::new(),
        }));
        assert!(text.contains("Impulses:    1000/kWh"));
        assert!(text.contains("Interval:    -"));
    }

    #[test]
    fn http_detail_includes_path() {
        let text = detail(&Meter::HttpElectricityMeter(HttpElectricityMeter {
            url: "http://plug/status".into(),
            username: None,
            password: None,
            factor_to_watt: Some(1.5),
            poll_interval: None,
            measurement_interval: None,
            content_protocol: Some("JSON".into()),
            path: Some("$.power".into()),
            extra: HashMap::new(),
        }));
        assert!(text.contains("Factor to W: 1.5"));
        assert!(text.contains("Path:        $.power"));
    }
}
