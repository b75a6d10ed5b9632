//! Command dispatch: bridges CLI args -> client calls -> output formatting.

pub mod appliances;
pub mod config_cmd;
pub mod control;
pub mod evs;
pub mod meter;
pub mod schedules;
pub mod settings;
pub mod util;

use sae_api::ApplianceClient;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a command that talks to SAE to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    client: &ApplianceClient,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Appliances(args) => appliances::handle(client, args, global).await,
        Command::Control(args) => control::handle(client, args, global).await,
        Command::Meter(args) => meter::handle(client, args, global).await,
        Command::Schedules(args) => schedules::handle(client, args, global).await,
        Command::Settings(args) => settings::handle(client, args, global).await,
        Command::Evs { id } => evs::handle(client, &id, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
