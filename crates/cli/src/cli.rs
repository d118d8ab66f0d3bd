//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use contracts::SensorKind;
use std::path::PathBuf;

/// Obsidian sensors - configure, validate and transport sensor records
#[derive(Parser, Debug)]
#[command(
    name = "obsidian-sensors",
    author,
    version,
    about = "Sensor record registry driver",
    long_about = "Loads sensor options, builds the typed records of every enabled sensor kind,\n\
                  validates them against the world geometry and exercises the wire codec."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "OBSIDIAN_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "compact",
        global = true,
        env = "OBSIDIAN_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    /// Serve Prometheus metrics on this port
    #[arg(long, global = true, env = "OBSIDIAN_METRICS_PORT")]
    pub metrics_port: Option<u16>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Default log level from the verbosity flags; RUST_LOG still wins
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse and validate every enabled sensor kind
    Validate(ValidateArgs),

    /// Print the options each sensor kind declares
    Schema(SchemaArgs),

    /// Parse the options and write them back out as a self-contained bundle
    Rewrite(RewriteArgs),

    /// Encode every enabled record and decode it again on concurrent workers
    Roundtrip(RoundtripArgs),
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to option file (TOML or JSON)
    #[arg(short, long, default_value = "sensors.toml", env = "OBSIDIAN_CONFIG")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `schema` command
#[derive(Parser, Debug)]
pub struct SchemaArgs {
    /// Only show this sensor kind
    #[arg(short, long)]
    pub kind: Option<SensorKind>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `rewrite` command
#[derive(Parser, Debug)]
pub struct RewriteArgs {
    /// Path to option file (TOML or JSON)
    #[arg(short, long, default_value = "sensors.toml", env = "OBSIDIAN_CONFIG")]
    pub config: PathBuf,

    /// Prefix for every written file, e.g. `out/run1_`
    #[arg(short, long)]
    pub prefix: String,

    /// Option file to write (default: `<prefix>options.toml`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `roundtrip` command
#[derive(Parser, Debug)]
pub struct RoundtripArgs {
    /// Path to option file (TOML or JSON)
    #[arg(short, long, default_value = "sensors.toml", env = "OBSIDIAN_CONFIG")]
    pub config: PathBuf,

    /// Number of concurrent decode workers
    #[arg(short, long, default_value = "4", value_parser = clap::value_parser!(u16).range(1..))]
    pub workers: u16,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
