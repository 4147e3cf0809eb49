//! CLI layer
//!
//! Owns everything the estimator core deliberately does not: argument
//! parsing, when to invoke `evaluate`, display formatting of the raw
//! learning-rate scalar, and profile file handling.

mod commands;
mod logging;

pub use commands::run_command;
pub use logging::LogLevel;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// lrtool: learning-rate heuristics for LoRA fine-tunes
#[derive(Parser, Debug, Clone)]
#[command(name = "lrtool")]
#[command(version)]
#[command(about = "Recommends a learning rate for LoRA fine-tunes of image-generation models")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Compute a learning-rate recommendation
    Estimate(EstimateArgs),

    /// List supported models, optimizers, schedulers, and objectives
    Info(InfoArgs),

    /// Check a profile file's stored statistics against a recomputation
    Validate(ValidateArgs),

    /// Write a default profile
    Init(InitArgs),
}

/// Output format for estimate results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format: {other}. Use: text, json")),
        }
    }
}

/// Arguments for the estimate command.
///
/// Unset flags fall back to the loaded profile (if `--profile` is given)
/// and then to the built-in defaults, so a profile can be replayed with
/// selective overrides.
#[derive(Parser, Debug, Clone)]
pub struct EstimateArgs {
    /// Seed parameters from a saved profile before applying flags
    #[arg(long, value_name = "FILE")]
    pub profile: Option<PathBuf>,

    /// Base model name [default: SDXL]
    #[arg(short, long)]
    pub model: Option<String>,

    /// Training resolution in pixels [default: 1024]
    #[arg(long)]
    pub resolution: Option<u32>,

    /// Total optimizer steps [default: 2000]
    #[arg(long)]
    pub steps: Option<u32>,

    /// Number of training images [default: 40]
    #[arg(long)]
    pub images: Option<u32>,

    /// Batch size [default: 1]
    #[arg(long)]
    pub batch: Option<u32>,

    /// Gradient accumulation steps [default: 2]
    #[arg(long)]
    pub grad_accum: Option<u32>,

    /// LoRA rank [default: 32]
    #[arg(long)]
    pub rank: Option<u32>,

    /// LoRA alpha [default: 16]
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Optimizer name [default: AdamW]
    #[arg(long)]
    pub optimizer: Option<String>,

    /// Scheduler name [default: Cosine]
    #[arg(long)]
    pub scheduler: Option<String>,

    /// Warmup as a percentage of total steps [default: 10]
    #[arg(long, value_name = "PERCENT")]
    pub warmup: Option<f64>,

    /// Training objective [default: Character]
    #[arg(long)]
    pub objective: Option<String>,

    /// Fractional adjustment of the recommendation, -1.0 to 1.0 [default: 0]
    #[arg(long, allow_hyphen_values = true)]
    pub offset: Option<f64>,

    /// Formula profile: rms (full model) or midpoint (standard mode)
    #[arg(long)]
    pub strategy: Option<crate::estimator::Strategy>,

    /// Save the resulting profile to this path
    #[arg(long, value_name = "FILE")]
    pub save: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the info command
#[derive(Parser, Debug, Clone)]
pub struct InfoArgs {
    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the validate command
#[derive(Parser, Debug, Clone)]
pub struct ValidateArgs {
    /// Profile file to validate
    #[arg(value_name = "FILE")]
    pub profile: PathBuf,
}

/// Arguments for the init command
#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Destination path [default: lrtool.default.json in the current directory]
    #[arg(value_name = "FILE")]
    pub path: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}
