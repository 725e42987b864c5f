//! Parallel simulation execution using rayon.
//!
//! This module provides functions to run single simulations and execute
//! multiple simulations in parallel for parameter sweeps.

use bevy_ecs::prelude::World;
use freight_core::runner::{initialize_simulation, run_until_empty, simulation_schedule};
use freight_core::scenario::{build_scenario, build_scenario_from_instance};
use freight_core::telemetry::{DeliveryRecord, DispatchRecord, FreightTelemetry};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::metrics::{extract_metrics, vehicle_capacities, LoadStatistics, SimulationResult};
use crate::parameters::{InstanceSource, ParameterSet};

/// Upper bound on processed events per run.
pub const MAX_STEPS: usize = 2_000_000;

/// Metrics plus the raw event logs of one run.
#[derive(Debug, Clone)]
pub struct SimulationArtifacts {
    pub metrics: SimulationResult,
    pub load: LoadStatistics,
    pub deliveries: Vec<DeliveryRecord>,
    pub dispatches: Vec<DispatchRecord>,
}

/// Runs one parameter set to completion (or its tick limit) and returns
/// metrics plus the dispatch and delivery logs.
pub fn run_single_simulation_with_artifacts(
    param_set: &ParameterSet,
) -> Result<SimulationArtifacts, String> {
    let mut world = World::new();
    let params = param_set.scenario_params();

    match &param_set.source {
        InstanceSource::Generated => {
            build_scenario(&mut world, params);
        }
        InstanceSource::Loaded(instance) => {
            build_scenario_from_instance(&mut world, instance, &params)
                .map_err(|error| format!("Invalid instance: {error}"))?;
        }
    }
    initialize_simulation(&mut world);

    let mut schedule = simulation_schedule();
    let steps = run_until_empty(&mut world, &mut schedule, MAX_STEPS);
    debug!(
        experiment_id = %param_set.experiment_id,
        run_id = param_set.run_id,
        steps,
        "simulation finished"
    );

    let metrics = extract_metrics(&mut world)?;
    if !metrics.terminated {
        warn!(
            experiment_id = %param_set.experiment_id,
            run_id = param_set.run_id,
            delivered = metrics.delivered_orders,
            total = metrics.total_orders,
            "run stopped before every order was delivered"
        );
    }

    let capacities = vehicle_capacities(&mut world);
    let telemetry = world
        .get_resource::<FreightTelemetry>()
        .ok_or_else(|| "FreightTelemetry resource not found".to_string())?;

    Ok(SimulationArtifacts {
        metrics,
        load: LoadStatistics::from_dispatches(&telemetry.dispatches, &capacities),
        deliveries: telemetry.deliveries.clone(),
        dispatches: telemetry.dispatches.clone(),
    })
}

/// Run a single simulation with the given parameter set.
///
/// Creates a new world, builds the scenario, runs the simulation to completion,
/// and extracts metrics from the results.
pub fn run_single_simulation(param_set: &ParameterSet) -> Result<SimulationResult, String> {
    run_single_simulation_with_artifacts(param_set).map(|artifacts| artifacts.metrics)
}

/// Run multiple simulations in parallel.
///
/// Uses rayon to execute simulations concurrently across available CPU cores.
/// Each simulation runs independently with no shared state.
///
/// # Arguments
///
/// * `parameter_sets` - Vector of parameter sets to run
/// * `num_threads` - Optional number of threads to use. If None, uses rayon's default.
///
/// # Returns
///
/// Artifacts in the same order as input parameter sets, or the first error.
pub fn run_parallel_experiments(
    parameter_sets: &[ParameterSet],
    num_threads: Option<usize>,
) -> Result<Vec<SimulationArtifacts>, String> {
    run_parallel_experiments_with_progress(parameter_sets, num_threads, true)
}

/// Run multiple simulations in parallel with optional progress bar.
pub fn run_parallel_experiments_with_progress(
    parameter_sets: &[ParameterSet],
    num_threads: Option<usize>,
    show_progress: bool,
) -> Result<Vec<SimulationArtifacts>, String> {
    let total = parameter_sets.len();
    let pb = if show_progress && total > 0 {
        let bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )
            .map(|style| style.progress_chars("#>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        Some(bar)
    } else {
        None
    };

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = num_threads {
        builder = builder.num_threads(threads);
    }
    let pool = builder
        .build()
        .map_err(|error| format!("Failed to create thread pool: {error}"))?;

    let pb_clone = pb.clone();
    let results = pool.install(|| {
        parameter_sets
            .par_iter()
            .map(|param_set| {
                let result = run_single_simulation_with_artifacts(param_set);
                if let Some(ref progress_bar) = pb_clone {
                    progress_bar.inc(1);
                }
                result
            })
            .collect::<Result<Vec<_>, String>>()
    });

    if let Some(ref progress_bar) = pb {
        progress_bar.finish_with_message("Completed");
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::ParameterSpace;
    use freight_core::scenario::{Instance, ScenarioParams};

    #[test]
    fn test_single_simulation() {
        let sets = ParameterSpace::grid()
            .num_vehicles(vec![3])
            .num_orders(vec![12])
            .generate();
        let result = run_single_simulation(&sets[0]).expect("run succeeds");

        assert!(result.terminated);
        assert_eq!(result.total_orders, 12);
        assert_eq!(result.delivered_orders, 12);
        assert_eq!(result.total_vehicles, 3);
        assert!(result.loaded_drives > 0);
        assert!(result.max_load <= 32);
    }

    #[test]
    fn test_parallel_experiments() {
        let sets = ParameterSpace::grid()
            .num_vehicles(vec![3, 5])
            .num_orders(vec![10, 20])
            .generate();
        let results =
            run_parallel_experiments_with_progress(&sets, Some(2), false).expect("runs succeed");

        assert_eq!(results.len(), 4);
        for (artifacts, set) in results.iter().zip(&sets) {
            assert_eq!(artifacts.metrics.total_orders, set.params.num_orders);
            assert_eq!(artifacts.deliveries.len(), set.params.num_orders);
        }
    }

    #[test]
    fn test_loaded_instance_runs_every_seed() {
        let instance = Instance::from_json_str(
            r#"{
                "vehicles": [{"id": 1, "capacity": 8, "start_region": 1, "freighter_id": 0}],
                "orders": [
                    {"id": 1, "origin": 1, "destination": 2, "volume": 3},
                    {"id": 2, "origin": 2, "destination": 1, "volume": 3}
                ]
            }"#,
        )
        .expect("valid instance");
        let sets = ParameterSpace::grid()
            .with_base(ScenarioParams::default().with_tick_limit(1_000))
            .with_instance(instance)
            .runs(2)
            .generate();
        assert_eq!(sets.len(), 2);

        let results = run_parallel_experiments_with_progress(&sets, Some(1), false).expect("runs");
        for artifacts in &results {
            assert!(artifacts.metrics.terminated);
            assert_eq!(artifacts.metrics.total_vehicles, 1);
            assert_eq!(artifacts.deliveries.len(), 2);
        }
    }
}
