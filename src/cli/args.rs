use crate::processors::NonFinitePolicy;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "era5-aermet")]
#[command(about = "Convert ERA5 reanalysis data into AERMET stage 1 input files")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the surface, upper-air and onsite files plus the control script
    Convert(RunArgs),

    /// Write the CD144 surface file only
    Surface(RunArgs),

    /// Write the FSL upper-air file only
    Upper(RunArgs),

    /// Write the 48-hour onsite placeholder file only
    Onsite(RunArgs),

    /// Write aermet_stage1.inp only
    Control(RunArgs),
}

/// Options shared by every subcommand. Flags override the config file.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[arg(short, long, help = "Configuration file (TOML, YAML or JSON)")]
    pub config: PathBuf,

    #[arg(short, long, help = "Surface dataset (.nc, .csv or .zip)")]
    pub surface: Option<PathBuf>,

    #[arg(short, long, help = "Pressure-level dataset (.nc, .csv or .zip)")]
    pub upper_air: Option<PathBuf>,

    #[arg(short, long, help = "Output directory")]
    pub output_dir: Option<PathBuf>,

    #[arg(long, help = "Prefix for generated file names [default: lowercased site name]")]
    pub prefix: Option<String>,

    #[arg(
        long,
        value_parser = parse_policy,
        help = "Handling of NaN/Inf values: substitute_zero or reject"
    )]
    pub non_finite: Option<NonFinitePolicy>,

    #[arg(long, help = "Sort extracted rows by timestamp before encoding")]
    pub sort: bool,

    #[arg(long, help = "Extract zipped inputs into this directory")]
    pub extract_dir: Option<PathBuf>,

    #[arg(short, long, help = "Hide the progress bar")]
    pub quiet: bool,
}

fn parse_policy(value: &str) -> Result<NonFinitePolicy, String> {
    NonFinitePolicy::parse(value)
        .ok_or_else(|| format!("unknown policy '{}' (expected substitute_zero or reject)", value))
}
