use crate::cli::args::{Cli, Commands, RunArgs};
use crate::error::{ProcessingError, Result};
use crate::models::ConversionConfig;
use crate::processors::Converter;
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing::Level;

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    match cli.command {
        Commands::Convert(args) => {
            let mut converter = build_converter(&args)?;
            let summary = converter.run()?;
            println!("\n{}", summary.summary());
            println!("\nNext: aermet {}", summary.paths.control.display());
        }

        Commands::Surface(args) => {
            let mut converter = build_converter(&args)?;
            let records = converter.surface()?;
            println!(
                "[OK] Surface: {} ({} records)",
                converter.paths().surface.display(),
                records
            );
        }

        Commands::Upper(args) => {
            let mut converter = build_converter(&args)?;
            let soundings = converter.upper_air()?;
            println!(
                "[OK] Upper air: {} ({} soundings)",
                converter.paths().upper_air.display(),
                soundings
            );
        }

        Commands::Onsite(args) => {
            let mut converter = build_converter(&args)?;
            let records = converter.onsite()?;
            println!(
                "[OK] Onsite: {} ({} records)",
                converter.paths().onsite.display(),
                records
            );
        }

        Commands::Control(args) => {
            let mut converter = build_converter(&args)?;
            converter.control()?;
            println!("[OK] INP: {}", converter.paths().control.display());
        }
    }

    Ok(())
}

/// Load the config file and apply command-line overrides
pub fn load_config(args: &RunArgs) -> Result<ConversionConfig> {
    let mut config = ConversionConfig::load(&args.config)?;

    if args.surface.is_some() {
        config.inputs.surface = args.surface.clone();
    }
    if args.upper_air.is_some() {
        config.inputs.upper_air = args.upper_air.clone();
    }
    if let Some(dir) = &args.output_dir {
        config.output.directory = dir.clone();
    }
    if args.prefix.is_some() {
        config.output.prefix = args.prefix.clone();
    }
    if let Some(policy) = args.non_finite {
        config.non_finite = policy;
    }
    if args.sort {
        config.sort_chronologically = true;
    }

    config.validate_all()?;
    Ok(config)
}

fn build_converter(args: &RunArgs) -> Result<Converter> {
    let config = load_config(args)?;
    let converter = Converter::new(config)?.silent(args.quiet);

    Ok(match &args.extract_dir {
        Some(dir) => converter.with_extract_dir(dir),
        None => converter,
    })
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let result = match log_file {
        Some(path) => {
            let file = File::create(path).map_err(|e| ProcessingError::write(path, e))?;
            tracing_subscriber::fmt()
                .with_max_level(if verbose { Level::DEBUG } else { Level::INFO })
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init()
        }
        None => tracing_subscriber::fmt()
            .with_max_level(if verbose { Level::DEBUG } else { Level::WARN })
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init(),
    };

    result.map_err(|e| ProcessingError::Config(format!("Failed to initialise logging: {}", e)))
}
