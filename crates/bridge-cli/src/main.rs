//! Bridge CLI - run and inspect one-lane bridge traffic simulations

use std::path::PathBuf;

use anyhow::{bail, Context};
use bridge_monitor::{ClassCounts, TurnPolicy};
use bridge_sim::{SimConfig, Simulation};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bridge")]
#[command(about = "One-lane bridge monitor - cars and pedestrians, never together")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Run a traffic simulation and print the report
    Run {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Number of cars
        #[arg(long)]
        cars: Option<usize>,
        /// Number of pedestrians
        #[arg(long)]
        pedestrians: Option<usize>,
        /// Random seed
        #[arg(long)]
        seed: Option<u64>,
        /// Duration multiplier, below 1 runs faster than real time
        #[arg(long)]
        time_scale: Option<f64>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check configuration validity
    Check {
        /// Configuration file path
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the turn assigned for a set of waiting counts
    Policy {
        /// Northbound cars waiting
        #[arg(long, default_value_t = 0)]
        north: u32,
        /// Southbound cars waiting
        #[arg(long, default_value_t = 0)]
        south: u32,
        /// Pedestrians waiting
        #[arg(long, default_value_t = 0)]
        pedestrians: u32,
        /// Pedestrians needed to claim the turn
        #[arg(long)]
        pedestrian_threshold: Option<u32>,
        /// Cars in one direction needed to claim the turn
        #[arg(long)]
        car_threshold: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match cli.command {
        Some(Commands::Run {
            config,
            cars,
            pedestrians,
            seed,
            time_scale,
            json,
        }) => {
            let mut config = load_config(config.as_deref())?;
            if let Some(cars) = cars {
                config.cars = cars;
            }
            if let Some(pedestrians) = pedestrians {
                config.pedestrians = pedestrians;
            }
            if let Some(time_scale) = time_scale {
                config.time_scale = time_scale;
            }
            if seed.is_some() {
                config.seed = seed;
            }

            let report = Simulation::new(config)?.run().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{report}");
            }
            if !report.is_clean() {
                bail!("simulation finished unclean: {:?}", report.safety);
            }
        }
        Some(Commands::Check { config }) => {
            let loaded = load_config(Some(&config))?;
            loaded
                .validate()
                .with_context(|| format!("invalid config {}", config.display()))?;
            println!(
                "Config OK: {} cars, {} pedestrians, thresholds P>={} N/S>={}",
                loaded.cars,
                loaded.pedestrians,
                loaded.policy.pedestrian_threshold,
                loaded.policy.car_threshold
            );
        }
        Some(Commands::Policy {
            north,
            south,
            pedestrians,
            pedestrian_threshold,
            car_threshold,
        }) => {
            let mut policy = TurnPolicy::default();
            if let Some(threshold) = pedestrian_threshold {
                policy = policy.with_pedestrian_threshold(threshold);
            }
            if let Some(threshold) = car_threshold {
                policy = policy.with_car_threshold(threshold);
            }
            policy.validate()?;

            let waiting = ClassCounts::new(north, south, pedestrians);
            println!("waiting[{waiting}] -> turn {}", policy.assign(&waiting));
        }
        None => {
            println!("bridge v{} - Use --help for commands", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<SimConfig> {
    match path {
        Some(path) => {
            info!("Loading config from {}", path.display());
            SimConfig::load(path).with_context(|| format!("failed to load {}", path.display()))
        }
        None => Ok(SimConfig::default()),
    }
}
