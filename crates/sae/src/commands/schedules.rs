//! Schedule command handlers.

use tabled::Tabled;

use sae_api::{ApplianceClient, Schedule};

use crate::cli::{GlobalOpts, SchedulesArgs, SchedulesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct ScheduleRow {
    #[tabled(rename = "Enabled")]
    enabled: String,
    #[tabled(rename = "Timeframe")]
    timeframe: String,
    #[tabled(rename = "Request")]
    request: String,
}

pub async fn handle(
    client: &ApplianceClient,
    args: SchedulesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SchedulesCommand::Get { id } => {
            let schedules = client
                .get_schedules(&id)
                .await
                .map_err(util::for_appliance(&id))?;
            let color = output::should_color(&global.color);
            let out = output::render_list(
                &global.output,
                &schedules,
                |s| ScheduleRow {
                    enabled: output::flag(s.enabled, color),
                    timeframe: s.timeframe.to_string(),
                    request: s.request.to_string(),
                },
                |s| format!("{}\t{}", s.timeframe, s.request),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SchedulesCommand::Set { id, file } => {
            let schedules: Vec<Schedule> = util::read_json_file(&file)?;
            client
                .save_schedules(&id, &schedules)
                .await
                .map_err(util::for_appliance(&id))?;
            output::status(
                &format!("Saved {} schedule(s) for {id}", schedules.len()),
                global.quiet,
            );
            Ok(())
        }
    }
}
