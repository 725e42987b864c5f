use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use freight_core::scenario::{generate_instance, load_instance, ActivationOrder, ScenarioParams};
use freight_experiments::parameter_spaces;
use freight_experiments::runner::run_parallel_experiments_with_progress;
use freight_experiments::{
    export_event_logs, export_to_csv, export_to_json, find_best_parameters, ParameterSet,
    ParameterSpace, SimulationResult,
};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "freight_sim",
    about = "Bee-colony freight consolidation simulator",
    long_about = "Runs the scout/onlooker order-to-vehicle assignment simulation on a\n\
                  loaded or generated instance and exports per-run event logs."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one or more seeded simulations
    Run {
        /// Instance JSON file; a random scenario is generated when omitted
        #[arg(long)]
        instance: Option<PathBuf>,
        /// Number of runs with consecutive seeds
        #[arg(long, default_value_t = 1)]
        runs: usize,
        /// Base seed
        #[arg(long, env = "FREIGHT_SEED", default_value_t = 0)]
        seed: u64,
        /// Order activation: creation_order or shuffled
        #[arg(long, default_value_t = ActivationOrder::CreationOrder)]
        activation: ActivationOrder,
        /// Initial order countdown in ticks
        #[arg(long, default_value_t = 10)]
        countdown: u32,
        /// Stop a run once this tick is reached
        #[arg(long)]
        max_ticks: Option<u64>,
        /// Worker threads (rayon default when omitted)
        #[arg(long)]
        threads: Option<usize>,
        /// Vehicles in a generated scenario
        #[arg(long, default_value_t = 10)]
        vehicles: usize,
        /// Orders in a generated scenario
        #[arg(long, default_value_t = 60)]
        orders: usize,
        /// Output directory for results and event logs
        #[arg(long, default_value = "freight_output")]
        output: PathBuf,
    },
    /// Run a named parameter sweep
    Sweep {
        /// One of: minimal, activation, countdown, fleet, weights
        #[arg(long, default_value = "minimal")]
        space: String,
        /// Worker threads (rayon default when omitted)
        #[arg(long)]
        threads: Option<usize>,
        /// Output directory for results
        #[arg(long, default_value = "freight_sweep")]
        output: PathBuf,
    },
    /// Write a random instance as JSON
    Generate {
        #[arg(long, default_value_t = 10)]
        vehicles: usize,
        #[arg(long, default_value_t = 60)]
        orders: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Output file path
        #[arg(long, default_value = "instance.json")]
        output: PathBuf,
    },
}

// ── commands ───────────────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
fn run(
    instance: Option<PathBuf>,
    runs: usize,
    seed: u64,
    activation: ActivationOrder,
    countdown: u32,
    max_ticks: Option<u64>,
    threads: Option<usize>,
    fleet: (usize, usize),
    output: PathBuf,
) -> Result<(), Box<dyn Error>> {
    let mut base = ScenarioParams::default()
        .with_fleet(fleet.0, fleet.1)
        .with_activation(activation)
        .with_order_countdown(countdown);
    if let Some(limit) = max_ticks {
        base = base.with_tick_limit(limit);
    }

    let mut space = ParameterSpace::grid()
        .with_base(base)
        .runs(runs)
        .seed(seed);
    if let Some(path) = instance {
        info!(path = %path.display(), "Loading instance");
        space = space.with_instance(load_instance(&path)?);
    }

    let parameter_sets = space.generate();
    execute(&parameter_sets, threads, output.as_path(), true)
}

fn sweep(space: &str, threads: Option<usize>, output: PathBuf) -> Result<(), Box<dyn Error>> {
    let space = parameter_spaces::by_name(space).ok_or_else(|| {
        format!(
            "unknown parameter space '{space}', expected one of: {}",
            parameter_spaces::SPACE_NAMES.join(", ")
        )
    })?;
    let parameter_sets = space.generate();
    execute(&parameter_sets, threads, output.as_path(), false)
}

fn generate(
    vehicles: usize,
    orders: usize,
    seed: u64,
    output: PathBuf,
) -> Result<(), Box<dyn Error>> {
    let params = ScenarioParams::default()
        .with_fleet(vehicles, orders)
        .with_seed(seed);
    let instance = generate_instance(&params);
    fs::write(&output, serde_json::to_string_pretty(&instance)?)?;
    info!(
        path = %output.display(),
        vehicles = instance.vehicles.len(),
        orders = instance.orders.len(),
        "Instance written"
    );
    Ok(())
}

fn execute(
    parameter_sets: &[ParameterSet],
    threads: Option<usize>,
    output: &Path,
    event_logs: bool,
) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(output)?;
    info!(runs = parameter_sets.len(), output = %output.display(), "Starting runs");

    let artifacts = run_parallel_experiments_with_progress(parameter_sets, threads, true)?;
    if event_logs {
        for (artifact, param_set) in artifacts.iter().zip(parameter_sets) {
            export_event_logs(artifact, param_set, output)?;
        }
    }

    let results: Vec<SimulationResult> =
        artifacts.into_iter().map(|artifact| artifact.metrics).collect();
    export_to_csv(&results, parameter_sets, output.join("results.csv"))?;
    export_to_json(&results, output.join("results.json"))?;

    for (result, param_set) in results.iter().zip(parameter_sets) {
        if !result.terminated {
            warn!(run = %param_set.file_prefix(), ticks = result.ticks, "Run did not complete");
        }
        info!(
            run = %param_set.file_prefix(),
            seed = param_set.seed,
            ticks = result.ticks,
            delivered = result.delivered_orders,
            loaded_drives = result.loaded_drives,
            load_per_drive = result.avg_load_per_drive,
            "Run finished"
        );
    }
    if let Some(best) = find_best_parameters(&results, parameter_sets) {
        info!(run = %best.file_prefix(), seed = best.seed, "Best run");
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            instance,
            runs,
            seed,
            activation,
            countdown,
            max_ticks,
            threads,
            vehicles,
            orders,
            output,
        } => run(
            instance,
            runs,
            seed,
            activation,
            countdown,
            max_ticks,
            threads,
            (vehicles, orders),
            output,
        ),
        Commands::Sweep {
            space,
            threads,
            output,
        } => sweep(&space, threads, output),
        Commands::Generate {
            vehicles,
            orders,
            seed,
            output,
        } => generate(vehicles, orders, seed, output),
    }
}
