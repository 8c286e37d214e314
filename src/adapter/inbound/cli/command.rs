//! Command-line interface definitions.
//!
//! Defines the CLI structure for the gpuarb application using `clap`.
//! Every analysis subcommand reads a JSON price file; detection flags
//! override the corresponding configuration values.

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

use super::paths;
use crate::application::analytics::DEFAULT_ANOMALY_THRESHOLD;
use crate::application::SortMode;
use crate::domain::Precision;

/// GPU rental cost-arbitrage detection and recommendations
#[derive(Parser, Debug)]
#[command(name = "gpuarb")]
#[command(version)]
pub struct Cli {
    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Top-level subcommands for the gpuarb CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detect arbitrage opportunities with confidence and risk
    Analyze(AnalyzeArgs),

    /// Project opportunities over a usage scenario
    Recommend(RecommendArgs),

    /// Export recommendations as CSV
    Export(ExportArgs),

    /// Rank offers by cost-performance value
    Values(ValuesArgs),

    /// Summarize observed provider availability next to reliability priors
    Providers(ProvidersArgs),

    /// List the GPU spec table
    Models(ConfigOptionArg),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Subcommands for `gpuarb config`.
///
/// Provides configuration management utilities including generation,
/// display, and validation of configuration files.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Generate a new configuration file from template.
    Init(ConfigInitArgs),
    /// Display the effective configuration with defaults applied.
    Show(ConfigOptionArg),
    /// Validate a configuration file for correctness.
    Validate(ConfigPathArg),
}

/// Shared argument struct for commands that require only a configuration path.
#[derive(Args, Debug)]
pub struct ConfigPathArg {
    /// Path to the configuration file.
    #[arg(short, long, default_value_os_t = paths::default_config())]
    pub config: PathBuf,
}

/// Optional configuration path; built-in defaults apply when the default
/// file does not exist.
#[derive(Args, Debug, Default, Clone)]
pub struct ConfigOptionArg {
    /// Path to the configuration file [default: ~/.gpuarb/config.toml]
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Detection and ranking overrides shared by the analysis commands.
#[derive(Args, Debug, Default, Clone)]
pub struct DetectArgs {
    #[command(flatten)]
    pub config: ConfigOptionArg,

    /// Minimum percentage savings to report (0-100)
    #[arg(long)]
    pub min_savings: Option<Decimal>,

    /// Minimum hourly price difference in USD
    #[arg(long)]
    pub min_difference: Option<Decimal>,

    /// Minimum number of distinct providers per model
    #[arg(long)]
    pub min_providers: Option<usize>,

    /// Sort order [savings, difference, price, confidence]
    #[arg(long)]
    pub sort: Option<SortMode>,

    /// Show at most this many results
    #[arg(long)]
    pub top: Option<usize>,

    /// Throughput precision for scoring [fp32, fp16, tensor]
    #[arg(long)]
    pub precision: Option<Precision>,
}

/// Usage scenario overrides.
#[derive(Args, Debug, Default, Clone)]
pub struct UsageArgs {
    /// Number of GPU instances
    #[arg(long)]
    pub units: Option<u32>,

    /// Rental duration in days
    #[arg(long)]
    pub days: Option<u32>,

    /// Hours of use per day (0-24]
    #[arg(long)]
    pub hours: Option<Decimal>,
}

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// JSON file containing an array of price records
    pub file: PathBuf,

    /// Only report this GPU model (any known alias)
    #[arg(long)]
    pub model: Option<String>,

    #[command(flatten)]
    pub detect: DetectArgs,
}

/// Arguments for the `recommend` subcommand.
#[derive(Args, Debug)]
pub struct RecommendArgs {
    /// JSON file containing an array of price records
    pub file: PathBuf,

    #[command(flatten)]
    pub detect: DetectArgs,

    #[command(flatten)]
    pub usage: UsageArgs,
}

/// Arguments for the `export` subcommand.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// JSON file containing an array of price records
    pub file: PathBuf,

    #[command(flatten)]
    pub detect: DetectArgs,

    #[command(flatten)]
    pub usage: UsageArgs,

    /// Output file path (writes to stdout if not specified).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `values` subcommand.
#[derive(Args, Debug)]
pub struct ValuesArgs {
    /// JSON file containing an array of price records
    pub file: PathBuf,

    #[command(flatten)]
    pub config: ConfigOptionArg,

    /// Only rank offers for this GPU model (any known alias)
    #[arg(long)]
    pub model: Option<String>,

    /// Flag prices this many standard deviations from their model's mean
    #[arg(long, default_value_t = DEFAULT_ANOMALY_THRESHOLD)]
    pub anomaly_threshold: f64,

    /// Throughput precision for scoring [fp32, fp16, tensor]
    #[arg(long)]
    pub precision: Option<Precision>,

    /// Show at most this many offers
    #[arg(long)]
    pub top: Option<usize>,
}

/// Arguments for the `providers` subcommand.
#[derive(Args, Debug)]
pub struct ProvidersArgs {
    /// JSON file containing an array of price records
    pub file: PathBuf,

    #[command(flatten)]
    pub config: ConfigOptionArg,
}

/// Arguments for the `config init` subcommand.
///
/// Controls configuration file generation from the built-in template.
#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output path for the generated configuration file.
    #[arg(default_value_os_t = paths::default_config())]
    pub path: PathBuf,
    /// Overwrite the file if it already exists.
    #[arg(long)]
    pub force: bool,
}
