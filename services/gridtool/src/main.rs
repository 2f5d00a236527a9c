//! Grid file inspection tool.
//!
//! Loads model grid files through `gridtools` to report their contents,
//! print derived A-grid coordinates, or rewrite them.

mod commands;
mod config;
mod report;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::FmtSubscriber;

use config::GridtoolConfig;

#[derive(Parser, Debug)]
#[command(name = "gridtool")]
#[command(about = "Inspect and rewrite model grid files")]
struct Args {
    /// Log level (overrides GRIDTOOL_LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit logs as JSON (overrides GRIDTOOL_LOG_JSON)
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show variables, dimensions and tile metadata of a grid file
    Info {
        /// Grid file path
        file: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print A-grid longitudes and latitudes (radians) derived from the supergrid
    Agrid {
        /// Grid file path
        file: PathBuf,
    },

    /// Load a grid file and write its grid variables to a new file
    Copy {
        /// Source grid file
        input: PathBuf,

        /// Destination file (overwritten)
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = GridtoolConfig::from_env().with_overrides(args.log_level.as_deref(), args.json_logs);

    init_tracing(&config)?;
    gridtools::silence_hdf5_errors();

    match args.command {
        Command::Info { file, json } => print!("{}", commands::run_info(&file, json)?),
        Command::Agrid { file } => print!("{}", commands::run_agrid(&file)?),
        Command::Copy { input, output } => commands::run_copy(&input, &output)?,
    }

    Ok(())
}

fn init_tracing(config: &GridtoolConfig) -> Result<()> {
    let builder = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .with_target(true)
        .with_writer(std::io::stderr);

    if config.json_logs {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    Ok(())
}
