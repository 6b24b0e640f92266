use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Marine heat wave detection.
#[derive(Parser)]
#[command(
    name = "mhw",
    version,
    about = "Marine heat wave and cold spell detection from gridded SST"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Compute the seasonal climatology and percentile threshold.
    Threshold(ThresholdArgs),
    /// Detect events against a stored climatology.
    Detect(DetectArgs),
}

/// Arguments for the `threshold` subcommand.
#[derive(clap::Args)]
pub struct ThresholdArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "mhw.toml")]
    pub config: PathBuf,

    /// Override the SST input path from config.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Override the climatology output path from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `detect` subcommand.
#[derive(clap::Args)]
pub struct DetectArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "mhw.toml")]
    pub config: PathBuf,

    /// Override the SST input path from config.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Override the climatology input path from config.
    #[arg(long)]
    pub climatology: Option<PathBuf>,

    /// Override the event table output path from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Detect cold spells; the climatology must come from a cold-spell
    /// `threshold` run.
    #[arg(long)]
    pub cold: bool,
}
