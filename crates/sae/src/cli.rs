//! Clap derive structures for the `sae` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// sae -- manage Smart Appliance Enabler installations
#[derive(Debug, Parser)]
#[command(
    name = "sae",
    version,
    about = "Manage Smart Appliance Enabler appliances from the command line",
    long_about = "Reads and writes appliances, controls, meters, schedules and settings\n\
        of a Smart Appliance Enabler installation through its REST API.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Installation profile to use
    #[arg(long, short = 'p', env = "SAE_PROFILE", global = true)]
    pub profile: Option<String>,

    /// SAE host (overrides profile)
    #[arg(long, short = 'H', env = "SAE_HOST", global = true)]
    pub host: Option<String>,

    /// SAE port (overrides profile)
    #[arg(long, short = 'P', env = "SAE_PORT", global = true)]
    pub port: Option<u16>,

    /// URL scheme, http or https (overrides profile)
    #[arg(long, env = "SAE_SCHEME", global = true)]
    pub scheme: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SAE_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "SAE_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "SAE_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage appliances
    #[command(alias = "app", alias = "a")]
    Appliances(AppliancesArgs),

    /// Manage how an appliance is switched
    #[command(alias = "ctl")]
    Control(ControlArgs),

    /// Manage how an appliance's power is measured
    Meter(MeterArgs),

    /// Manage appliance schedules
    #[command(alias = "sched")]
    Schedules(SchedulesArgs),

    /// Manage global settings
    Settings(SettingsArgs),

    /// List electric vehicles of a wallbox appliance
    Evs {
        /// Appliance ID (e.g. F-00000001-000000000001-00)
        id: String,
    },

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Appliances ───────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AppliancesArgs {
    #[command(subcommand)]
    pub command: AppliancesCommand,
}

#[derive(Debug, Subcommand)]
pub enum AppliancesCommand {
    /// List appliances
    #[command(alias = "ls")]
    List,

    /// Get appliance details
    Get {
        /// Appliance ID
        id: String,
    },

    /// Create or replace an appliance from a JSON file
    Save {
        /// JSON file with the appliance configuration
        #[arg(long, short = 'f', value_name = "PATH")]
        file: PathBuf,

        /// Create a new appliance instead of replacing an existing one
        #[arg(long)]
        create: bool,
    },

    /// Delete an appliance
    #[command(alias = "rm")]
    Delete {
        /// Appliance ID
        id: String,
    },
}

// ── Control / Meter ──────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ControlArgs {
    #[command(subcommand)]
    pub command: RecordCommand,
}

#[derive(Debug, Args)]
pub struct MeterArgs {
    #[command(subcommand)]
    pub command: RecordCommand,
}

/// Subcommands shared by the per-appliance control and meter records.
#[derive(Debug, Subcommand)]
pub enum RecordCommand {
    /// Show server defaults
    Defaults,

    /// Show the record stored for an appliance
    Get {
        /// Appliance ID
        id: String,
    },

    /// Replace the record of an appliance from a JSON file
    Set {
        /// Appliance ID
        id: String,

        /// JSON file with the record
        #[arg(long, short = 'f', value_name = "PATH")]
        file: PathBuf,
    },

    /// Remove the record of an appliance
    #[command(alias = "rm")]
    Delete {
        /// Appliance ID
        id: String,
    },
}

// ── Schedules ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SchedulesArgs {
    #[command(subcommand)]
    pub command: SchedulesCommand,
}

#[derive(Debug, Subcommand)]
pub enum SchedulesCommand {
    /// Show the schedules of an appliance
    Get {
        /// Appliance ID
        id: String,
    },

    /// Replace all schedules of an appliance from a JSON array file
    Set {
        /// Appliance ID
        id: String,

        /// JSON file with an array of schedules
        #[arg(long, short = 'f', value_name = "PATH")]
        file: PathBuf,
    },
}

// ── Settings ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: SettingsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Show server defaults
    Defaults,

    /// Show the current settings
    Get,

    /// Replace the settings from a JSON file
    Set {
        /// JSON file with the settings
        #[arg(long, short = 'f', value_name = "PATH")]
        file: PathBuf,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current resolved configuration
    Show,

    /// Print the config file location
    Path,

    /// Set a value on the active profile
    Set {
        /// Profile key: host, scheme, port, context_path, insecure, timeout
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
