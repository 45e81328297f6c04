use clap::Parser;
use era5_aermet::cli::{run, Cli};
use era5_aermet::error::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}
