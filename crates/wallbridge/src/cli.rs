//! Clap derive structures for the `wallbridge` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use clap::{Args, Parser, Subcommand, ValueEnum};

use wallbridge_core::{LedMode, Side};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// wallbridge -- control Alpha EV wallboxes from the command line
#[derive(Debug, Parser)]
#[command(
    name = "wallbridge",
    version,
    about = "Monitor and control Alpha EV wallboxes over the local network",
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
    /// Configured wallbox to use
    #[arg(long, short = 'w', env = "WALLBRIDGE_WALLBOX", global = true)]
    pub wallbox: Option<String>,

    /// Device address (overrides the config file; password must come
    /// from WALLBRIDGE_PASSWORD)
    #[arg(long, env = "WALLBRIDGE_HOST", global = true)]
    pub host: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "WALLBRIDGE_OUTPUT",
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

    /// Request timeout in seconds
    #[arg(long, env = "WALLBRIDGE_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// key=value lines (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Value enums bridging to core types ───────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SideArg {
    A,
    B,
}

impl From<SideArg> for Side {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::A => Side::A,
            SideArg::B => Side::B,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LedModeArg {
    /// LED always on
    On,
    /// LED on only while a car is connected
    OnIfRequired,
    /// LED always off
    Off,
}

impl From<LedModeArg> for LedMode {
    fn from(mode: LedModeArg) -> Self {
        match mode {
            LedModeArg::On => LedMode::On,
            LedModeArg::OnIfRequired => LedMode::OnIfRequired,
            LedModeArg::Off => LedMode::Off,
        }
    }
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch and display the current wallbox state
    #[command(alias = "st")]
    Status,

    /// Poll continuously and re-render on every change (Ctrl-C to stop)
    Watch(WatchArgs),

    /// Set a charging current limit
    SetCurrent(SetCurrentArgs),

    /// Lock the charging cable on one side
    Lock(LockArgs),

    /// Unlock the charging cable on one side
    Unlock(LockArgs),

    /// Show or set the status LED mode
    Led(LedArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Poll interval in seconds (overrides the config file)
    #[arg(long, short = 'i')]
    pub interval: Option<u64>,
}

#[derive(Debug, Args)]
pub struct SetCurrentArgs {
    /// Current limit in amps
    #[arg(value_name = "AMPS")]
    pub amps: u8,

    /// Limit one side instead of the total across both
    #[arg(long, short = 's', value_enum)]
    pub side: Option<SideArg>,
}

#[derive(Debug, Args)]
pub struct LockArgs {
    /// Charge point side
    #[arg(value_enum, default_value = "a")]
    pub side: SideArg,
}

#[derive(Debug, Args)]
pub struct LedArgs {
    /// New LED mode; omit to show the current one
    #[arg(value_enum)]
    pub mode: Option<LedModeArg>,
}

// ── Config subcommands ───────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// Set the default wallbox
    Use {
        /// Wallbox name to set as default
        name: String,
    },

    /// Store a wallbox password in the system keyring
    SetPassword {
        /// Wallbox name (defaults to the selected wallbox)
        #[arg(long)]
        wallbox: Option<String>,
    },
}
