//! Parameter variation framework for exploring simulation parameter space.
//!
//! This module provides tools for defining parameter spaces and generating
//! parameter sets for parallel experimentation. Supports grid search and
//! random sampling strategies.

use std::sync::Arc;

use freight_core::matching::ObjectiveWeights;
use freight_core::scenario::{ActivationOrder, Instance, ScenarioParams};

mod combinations;
mod constraints;
mod conversion;
mod sampling;

use combinations::ParameterVariations;
use constraints::is_valid_combination;
use conversion::combination_to_parameter_sets;

/// Where the vehicles and orders of a run come from.
#[derive(Debug, Clone, Default)]
pub enum InstanceSource {
    /// Random instance generated from the run's `ScenarioParams` and seed.
    #[default]
    Generated,
    /// A loaded instance shared by every run that uses it.
    Loaded(Arc<Instance>),
}

impl InstanceSource {
    pub fn label(&self) -> &'static str {
        match self {
            InstanceSource::Generated => "generated",
            InstanceSource::Loaded(_) => "instance",
        }
    }
}

/// A single parameter configuration for a simulation run.
///
/// Wraps `ScenarioParams` with additional experiment metadata for tracking
/// and reproducibility.
#[derive(Debug, Clone)]
pub struct ParameterSet {
    /// Base scenario parameters.
    pub params: ScenarioParams,
    pub source: InstanceSource,
    /// Experiment ID shared by all runs of one parameter combination.
    pub experiment_id: String,
    /// Run ID within the experiment (for multiple runs with same params).
    pub run_id: usize,
    /// Seed used for this run (ensures reproducibility).
    pub seed: u64,
}

impl ParameterSet {
    /// Create a new parameter set with the given parameters and metadata.
    pub fn new(
        params: ScenarioParams,
        source: InstanceSource,
        experiment_id: String,
        run_id: usize,
        seed: u64,
    ) -> Self {
        Self {
            params,
            source,
            experiment_id,
            run_id,
            seed,
        }
    }

    /// Get the scenario params with seed applied.
    pub fn scenario_params(&self) -> ScenarioParams {
        let mut params = self.params.clone();
        params.seed = Some(self.seed);
        params
    }

    /// File name prefix for this run's event logs, e.g. `exp_0_run_2`.
    pub fn file_prefix(&self) -> String {
        format!("{}_run_{}", self.experiment_id, self.run_id)
    }
}

/// Defines a parameter space for exploration.
///
/// Supports grid search (Cartesian product) and random sampling strategies.
#[derive(Debug, Clone)]
pub struct ParameterSpace {
    /// Base parameters (used as defaults for unspecified parameters).
    base: ScenarioParams,
    source: InstanceSource,
    activations: Vec<ActivationOrder>,
    order_countdowns: Vec<u32>,
    num_vehicles: Vec<usize>,
    num_orders: Vec<usize>,
    max_order_volumes: Vec<u32>,
    weights: Vec<ObjectiveWeights>,
    /// Seeded repetitions of every combination.
    runs_per_combination: usize,
    base_seed: u64,
}

impl ParameterSpace {
    /// Create a new parameter space with default base parameters.
    pub fn new() -> Self {
        Self {
            base: ScenarioParams::default(),
            source: InstanceSource::Generated,
            activations: vec![],
            order_countdowns: vec![],
            num_vehicles: vec![],
            num_orders: vec![],
            max_order_volumes: vec![],
            weights: vec![],
            runs_per_combination: 1,
            base_seed: 0,
        }
    }

    /// Create a new parameter space for grid search.
    pub fn grid() -> Self {
        Self::new()
    }

    /// Set activation orders to explore.
    pub fn activation(mut self, orders: Vec<ActivationOrder>) -> Self {
        self.activations = orders;
        self
    }

    /// Set initial order countdowns to explore.
    pub fn order_countdown(mut self, countdowns: Vec<u32>) -> Self {
        self.order_countdowns = countdowns;
        self
    }

    /// Set number of vehicles to explore. Ignored for loaded instances.
    pub fn num_vehicles(mut self, counts: Vec<usize>) -> Self {
        self.num_vehicles = counts;
        self
    }

    /// Set number of orders to explore. Ignored for loaded instances.
    pub fn num_orders(mut self, counts: Vec<usize>) -> Self {
        self.num_orders = counts;
        self
    }

    pub fn max_order_volume(mut self, volumes: Vec<u32>) -> Self {
        self.max_order_volumes = volumes;
        self
    }

    /// Set objective weights to explore.
    pub fn weights(mut self, weights: Vec<ObjectiveWeights>) -> Self {
        self.weights = weights;
        self
    }

    /// Repeat every combination `runs` times with consecutive seeds.
    pub fn runs(mut self, runs: usize) -> Self {
        self.runs_per_combination = runs.max(1);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.base_seed = seed;
        self
    }

    /// Run every combination against the same loaded instance.
    pub fn with_instance(mut self, instance: Instance) -> Self {
        self.source = InstanceSource::Loaded(Arc::new(instance));
        self
    }

    /// Set base parameters (used as defaults).
    pub fn with_base(mut self, base: ScenarioParams) -> Self {
        self.base = base;
        self
    }

    /// Generate all parameter sets using grid search (Cartesian product).
    ///
    /// Each combination of specified parameters will be generated, once per
    /// run. Parameters not specified will use values from the base configuration.
    pub fn generate(&self) -> Vec<ParameterSet> {
        let variations = ParameterVariations::from_space(self);

        variations
            .generate_combinations()
            .filter(is_valid_combination)
            .enumerate()
            .flat_map(|(experiment_id, combo)| {
                combination_to_parameter_sets(self, combo, experiment_id)
            })
            .collect()
    }
}

impl Default for ParameterSpace {
    fn default() -> Self {
        Self::new()
    }
}
