//! Run command - simulate one airport and print the report.

use std::path::PathBuf;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use margolis::config::{AirportProfile, SimulationConfig};
use margolis::simulation::Simulation;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the run command.
#[derive(Debug, Default)]
pub struct RunArgs {
    pub config: Option<PathBuf>,
    pub airport: Option<AirportProfile>,
    pub duration: Option<u64>,
    pub max_planes: Option<usize>,
    pub seed: Option<u64>,
    pub debug: bool,
}

/// Run the run command.
pub fn run(args: RunArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(args.config.as_deref(), args.debug)?;
    runner.log_startup("run");

    let config = apply_overrides(runner.config().simulation.clone(), &args);
    let simulation = Simulation::new(config)?;

    print_banner();
    print_opening(simulation.config());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;

    let report = runtime.block_on(async {
        let shutdown = CancellationToken::new();
        let ctrl_c = shutdown.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Received Ctrl+C, stopping simulation");
                    ctrl_c.cancel();
                }
                Err(e) => warn!(error = %e, "Failed to listen for Ctrl+C"),
            }
        });

        simulation.run(shutdown).await
    });

    println!();
    println!("{report}");
    Ok(())
}

/// Apply command-line overrides on top of the loaded configuration.
fn apply_overrides(mut config: SimulationConfig, args: &RunArgs) -> SimulationConfig {
    if let Some(airport) = args.airport {
        config.airport = airport;
        config.international_percentage = airport.international_percentage();
    }
    if let Some(secs) = args.duration {
        config.duration = Duration::from_secs(secs);
    }
    if let Some(max_planes) = args.max_planes {
        config.max_planes = max_planes;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config
}

fn print_banner() {
    println!();
    println!("==============================================");
    println!("  Margolis v{}", margolis::VERSION);
    println!("  Airport contention simulator");
    println!("==============================================");
    println!();
}

fn print_opening(config: &SimulationConfig) {
    let airport = config.airport;
    println!("Opening {} ({})", airport.long_name(), airport.location());
    println!(
        "  International traffic: {}%",
        config.international_percentage
    );
    println!(
        "  Resources:             {} runways, {} towers, {} gates",
        config.resources.runway, config.resources.tower, config.resources.gate
    );
    println!(
        "  Duration:              {}s (up to {} planes)",
        config.duration.as_secs(),
        config.max_planes
    );
    if let Some(seed) = config.seed {
        println!("  Seed:                  {}", seed);
    }
    println!();
    println!("Simulation running. Press Ctrl+C to stop early.");
}
