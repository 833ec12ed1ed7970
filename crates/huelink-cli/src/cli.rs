//! Clap derive structures for the `huelink` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// huelink -- control Hue-style lighting bridges from the command line
#[derive(Debug, Parser)]
#[command(
    name = "huelink",
    version,
    about = "Control a Hue lighting bridge from the command line",
    long_about = "Discover a Hue-style lighting bridge, pair with it via the\n\
        link button, and read or change per-light state (on/off,\n\
        brightness, saturation, hue).",
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
    /// Bridge profile to use
    #[arg(long, short = 'p', env = "HUE_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Bridge address, host or host:port (skips cloud discovery)
    #[arg(long, short = 'b', env = "HUE_BRIDGE", global = true)]
    pub bridge: Option<String>,

    /// Bridge credential (skips pairing)
    #[arg(long, env = "HUE_CREDENTIAL", global = true, hide_env = true)]
    pub credential: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "HUE_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Never prompt; fail instead of waiting for the link button
    #[arg(long, env = "HUE_NON_INTERACTIVE", global = true)]
    pub non_interactive: bool,

    /// GET request timeout in seconds
    #[arg(long, env = "HUE_TIMEOUT", default_value = "10", global = true)]
    pub timeout: u64,
}

// ── Output Enum ──────────────────────────────────────────────────────

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

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Find a bridge on this network via cloud discovery
    Discover,

    /// Pair with a bridge (press-button handshake) and print the credential
    Pair(PairArgs),

    /// Enumerate the bridge's lights
    #[command(alias = "ls")]
    Lights(LightsArgs),

    /// Read or change one light's state
    #[command(alias = "l")]
    Light(LightArgs),

    /// Manage configuration profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Pair ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PairArgs {
    /// Application name baked into the minted credential
    #[arg(long, default_value = "huelink")]
    pub app_name: String,

    /// Device name baked into the minted credential
    #[arg(long, default_value = "default-device")]
    pub device_name: String,

    /// Store the minted credential (keyring, falling back to the config file)
    #[arg(long)]
    pub save: bool,
}

// ── Lights ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LightsArgs {
    #[command(subcommand)]
    pub command: LightsCommand,
}

#[derive(Debug, Subcommand)]
pub enum LightsCommand {
    /// List all lights with their current state
    List,
}

// ── Light ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LightArgs {
    /// Light ID (as reported by `huelink lights list`)
    pub id: String,

    #[command(subcommand)]
    pub command: LightCommand,
}

#[derive(Debug, Subcommand)]
pub enum LightCommand {
    /// Show the light's current state
    State,
    /// Turn the light on
    On,
    /// Turn the light off
    Off,
    /// Toggle the light (read current state, write its negation)
    Toggle,
    /// Set brightness (0-254)
    Bri { value: u8 },
    /// Set saturation (0-254)
    Sat { value: u8 },
    /// Set hue (0-65535)
    Hue { value: u16 },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a starter config file (no-op if one exists)
    Init,
    /// Print the effective configuration (credentials redacted)
    Show,
    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
