//! CLI argument definitions for the pipeline engine.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "nexus",
    version,
    about = "Nexus - multi-format data pipeline engine",
    long_about = "Run JSON, CSV and stream inputs through named stage pipelines.\n\n\
                  Pipelines are registered from a TOML registry (or the built-in demo\n\
                  registry) and support backup failover and multi-pipeline chaining."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Pipeline registry file (default: built-in demo registry).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Replay the reference walkthrough and print pipeline statistics.
    Demo,

    /// Execute one pipeline.
    Run(RunArgs),

    /// Execute pipelines in order, feeding each result into the next.
    Chain(ChainArgs),

    /// List registered pipelines and their backups.
    Pipelines,
}

#[derive(Args)]
pub struct InputArgs {
    /// Raw input handed to the first pipeline.
    #[arg(value_name = "INPUT")]
    pub input: String,

    /// Decode INPUT as a JSON value first (mapping or sequence input).
    #[arg(long = "json")]
    pub json: bool,

    /// Print pipeline statistics after the run.
    #[arg(long = "stats")]
    pub stats: bool,
}

#[derive(Args)]
pub struct RunArgs {
    /// Pipeline identifier.
    #[arg(value_name = "PIPELINE")]
    pub pipeline: String,

    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Args)]
pub struct ChainArgs {
    /// Comma-separated pipeline identifiers, in execution order.
    #[arg(value_name = "PIPELINES")]
    pub pipelines: String,

    #[command(flatten)]
    pub input: InputArgs,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
