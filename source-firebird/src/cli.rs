//! Command-line interface definition.

use clap::{Args, Parser, Subcommand, ValueEnum};
use source_firebird_core::LogFormat;
use std::path::PathBuf;

/// CLI argument structure
#[derive(Debug, Parser)]
#[command(name = "source-firebird")]
#[command(about = "Full-refresh Firebird source connector")]
#[command(version)]
#[command(long_about = "
Firebird source connector

Exposes every user table of a Firebird database as a full-refresh stream.
Protocol messages are written to stdout as newline-delimited JSON;
diagnostics go to stderr.

EXAMPLES:
  source-firebird spec
  source-firebird check --config secrets/config.json
  source-firebird discover --config secrets/config.json
  source-firebird read --config secrets/config.json --catalog configured_catalog.json
")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the connector specification
    Spec,
    /// Test connectivity to the database
    Check(ConfigArgs),
    /// List every user table as a stream with its schema
    Discover(ConfigArgs),
    /// Read every row of the streams selected in a configured catalog
    Read(ReadArgs),
    /// Run an ad hoc SELECT and emit its rows as records
    Query(QueryArgs),
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Path to the JSON configuration document
    #[arg(long, value_name = "FILE")]
    pub config: PathBuf,
}

#[derive(Debug, Args)]
pub struct ReadArgs {
    /// Path to the JSON configuration document
    #[arg(long, value_name = "FILE")]
    pub config: PathBuf,

    /// Path to the configured catalog selecting the streams to read
    #[arg(long, value_name = "FILE")]
    pub catalog: PathBuf,

    /// State file; accepted for compatibility and ignored
    #[arg(long, value_name = "FILE")]
    pub state: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Path to the JSON configuration document
    #[arg(long, value_name = "FILE")]
    pub config: PathBuf,

    /// Statement to run
    #[arg(long)]
    pub sql: String,

    /// Stream name to tag the resulting records with
    #[arg(long)]
    pub stream: String,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true, help = "Only log errors")]
    pub quiet: bool,

    /// Log line format on stderr
    #[arg(long, global = true, value_enum, default_value_t = LogFormatArg::Text)]
    pub log_format: LogFormatArg,
}

/// `--log-format` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Text,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Text => Self::Text,
            LogFormatArg::Json => Self::Json,
        }
    }
}
