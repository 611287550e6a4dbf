//! Margolis CLI - Command-line interface
//!
//! Runs airport contention simulations and lists the available airport
//! traffic profiles.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::run::RunArgs;
use margolis::config::AirportProfile;

#[derive(Parser)]
#[command(name = "margolis")]
#[command(version = margolis::VERSION)]
#[command(about = "Simulate airport resource contention, deadlock and starvation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation and print the final report
    Run {
        /// Configuration file (defaults to ~/.margolis/config.ini)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Airport traffic profile (jfk, lhr, dxb, atl, gru)
        #[arg(long)]
        airport: Option<AirportProfile>,

        /// Simulated duration in seconds
        #[arg(long)]
        duration: Option<u64>,

        /// Maximum number of planes spawned in the run
        #[arg(long)]
        max_planes: Option<usize>,

        /// RNG seed for a reproducible traffic sequence
        #[arg(long)]
        seed: Option<u64>,

        /// Enable debug-level logging
        #[arg(long)]
        debug: bool,
    },

    /// List the airport traffic profiles
    Profiles,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            config,
            airport,
            duration,
            max_planes,
            seed,
            debug,
        } => commands::run::run(RunArgs {
            config,
            airport,
            duration,
            max_planes,
            seed,
            debug,
        }),
        Commands::Profiles => commands::profiles::run(),
    };

    if let Err(e) = result {
        e.exit();
    }
}
