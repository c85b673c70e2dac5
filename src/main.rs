use anyhow::{Context, Result};
use clap::Parser;
use elevator_sim::config::{load_config, SimConfig};
use elevator_sim::driver::DriverHandle;
use elevator_sim::simulation::{error_kind, ElevatorSnapshot, SimBuilding, SimulationStats};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

#[derive(Parser)]
#[command(name = "elevator_sim")]
#[command(about = "Multi-elevator building simulation")]
struct Cli {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of floors, overrides the configuration
    #[arg(long)]
    floors: Option<usize>,

    /// Number of elevators, overrides the configuration
    #[arg(long)]
    elevators: Option<usize>,

    /// Passengers per elevator, overrides the configuration
    #[arg(long)]
    capacity: Option<usize>,

    /// Milliseconds to travel one floor, overrides the configuration
    #[arg(long = "travel-ms")]
    travel_ms: Option<u64>,

    /// Maximum number of ticks in headless mode
    #[arg(long, default_value = "500")]
    ticks: u64,

    /// Random passenger requests to issue in headless mode
    #[arg(long, default_value = "20")]
    requests: usize,

    /// Seed for the request generator
    #[arg(long)]
    seed: Option<u64>,

    /// Read requests from stdin while a driver ticks in the background
    #[arg(long)]
    interactive: bool,

    /// Print the final state as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct FinalState {
    stats: SimulationStats,
    elevators: Vec<ElevatorSnapshot>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = build_config(&cli)?;
    let building = Arc::new(SimBuilding::new(&config)?);

    if cli.interactive {
        run_interactive(Arc::clone(&building), &config)?;
    } else {
        run_headless(&building, &config, &cli)?;
    }

    if cli.json {
        let state = FinalState {
            stats: building.stats(),
            elevators: building.status(),
        };
        println!("{}", serde_json::to_string_pretty(&state)?);
    }
    Ok(())
}

fn build_config(cli: &Cli) -> Result<SimConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => SimConfig::default(),
    };

    if let Some(floors) = cli.floors {
        config.building.floors = floors;
    }
    if let Some(elevators) = cli.elevators {
        config.building.elevators = elevators;
    }
    if let Some(capacity) = cli.capacity {
        config.elevator.capacity = capacity;
    }
    if let Some(travel_ms) = cli.travel_ms {
        config.elevator.travel_time_ms = travel_ms;
    }

    config.validate()?;
    Ok(config)
}

/// Issue random requests, one per tick, and tick until everyone is delivered
fn run_headless(building: &SimBuilding, config: &SimConfig, cli: &Cli) -> Result<()> {
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let floors = config.building.floors as i32;

    info!(
        "Running headless: {} requests, at most {} ticks",
        cli.requests, cli.ticks
    );

    let mut issued = 0;
    let mut ticks = 0;
    while ticks < cli.ticks && (issued < cli.requests || !building.is_settled()) {
        if issued < cli.requests && floors > 1 {
            let origin = rng.random_range(0..floors);
            let mut destination = rng.random_range(0..floors - 1);
            if destination >= origin {
                destination += 1;
            }
            let count = rng.random_range(1..=3);
            if let Err(e) = building.add_passengers(count, origin, destination) {
                warn!("Request {} failed: {:#}", issued, e);
            }
            issued += 1;
        } else if issued < cli.requests {
            warn!("A single floor building has no trips to request");
            issued = cli.requests;
        }

        let report = building.tick();
        ticks += 1;
        for (elevator, floor) in report.arrivals() {
            debug!(
                "Tick {}: elevator {} arrived at floor {}",
                ticks, elevator.0, floor
            );
        }

        if ticks % 25 == 0 && !cli.json {
            building.print_summary();
            println!();
        }
    }

    let stats = building.stats();
    if !cli.json {
        building.print_summary();
    }
    info!("=== SIMULATION COMPLETE ===");
    info!("Total passengers spawned: {}", stats.passengers_spawned);
    info!(
        "Total passengers delivered: {}",
        stats.passengers_delivered
    );
    info!(
        "Passengers still in system: {}",
        building.passengers_in_system()
    );
    info!("Ticks run: {}", ticks);
    info!("Delivery rate: {:.1}%", stats.delivery_rate());

    if !building.is_settled() {
        warn!("Tick limit reached before every passenger was delivered");
    }
    Ok(())
}

/// Read `<count> <origin> <destination>` lines until `quit` or end of input
fn run_interactive(building: Arc<SimBuilding>, config: &SimConfig) -> Result<()> {
    let (driver, updates) = DriverHandle::spawn(building, config.driver.tick_interval())?;

    let reporter = thread::Builder::new()
        .name("status-reporter".to_string())
        .spawn(move || {
            for update in updates {
                for (elevator, floor) in update.report.arrivals() {
                    debug!(
                        "Tick {}: elevator {} arrived at floor {}",
                        update.tick, elevator.0, floor
                    );
                }
            }
        })
        .context("Failed to start status reporter")?;

    println!("Commands: <count> <origin> <destination> | status | quit");
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        let words: Vec<&str> = line.split_whitespace().collect();

        match words.as_slice() {
            [] => continue,
            ["quit"] | ["exit"] => break,
            ["status"] => driver.building().print_summary(),
            [count, origin, destination] => match parse_request(count, origin, destination) {
                Ok((count, origin, destination)) => {
                    match driver.add_passengers(count, origin, destination) {
                        Ok(ids) => println!("Queued {} passenger(s)", ids.len()),
                        Err(e) => match error_kind(&e) {
                            Some(kind) => println!("Rejected: {}", kind),
                            None => println!("Rejected: {:#}", e),
                        },
                    }
                }
                Err(e) => println!("{:#}", e),
            },
            _ => println!("Unrecognised command: {}", line.trim()),
        }
        io::stdout().flush()?;
    }

    driver.shutdown()?;
    if reporter.join().is_err() {
        warn!("Status reporter panicked");
    }
    Ok(())
}

fn parse_request(count: &str, origin: &str, destination: &str) -> Result<(usize, i32, i32)> {
    let count = count
        .parse()
        .with_context(|| format!("Invalid passenger count '{}'", count))?;
    let origin = origin
        .parse()
        .with_context(|| format!("Invalid origin floor '{}'", origin))?;
    let destination = destination
        .parse()
        .with_context(|| format!("Invalid destination floor '{}'", destination))?;
    Ok((count, origin, destination))
}
