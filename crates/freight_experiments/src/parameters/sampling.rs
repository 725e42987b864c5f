use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::combinations::{ParameterCombination, ParameterVariations};
use super::constraints::is_valid_combination;
use super::conversion::combination_to_parameter_sets;
use super::{ParameterSet, ParameterSpace};

const MAX_ATTEMPTS: usize = 10_000;

impl ParameterSpace {
    /// Generate random parameter sets (Monte Carlo sampling).
    ///
    /// Samples up to `count` distinct combinations from the defined space; each
    /// yields one parameter set per configured run. Stops early when the space
    /// has fewer distinct valid combinations than requested.
    pub fn sample_random(&self, count: usize, seed: u64) -> Vec<ParameterSet> {
        let variations = ParameterVariations::from_space(self);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut seen: HashSet<String> = HashSet::new();
        let mut parameter_sets = Vec::new();
        let mut attempts = 0;

        while seen.len() < count && attempts < MAX_ATTEMPTS {
            attempts += 1;
            let Some(combo) = sample_combination(&variations, &mut rng) else {
                break;
            };
            if !is_valid_combination(&combo) || !seen.insert(format!("{combo:?}")) {
                continue;
            }
            let experiment_id = seen.len() - 1;
            parameter_sets.extend(combination_to_parameter_sets(self, combo, experiment_id));
        }

        parameter_sets
    }
}

fn sample_combination(
    variations: &ParameterVariations,
    rng: &mut StdRng,
) -> Option<ParameterCombination> {
    Some(ParameterCombination {
        activation: *variations.activations().choose(rng)?,
        order_countdown: *variations.order_countdowns().choose(rng)?,
        num_vehicles: *variations.num_vehicles().choose(rng)?,
        num_orders: *variations.num_orders().choose(rng)?,
        max_order_volume: *variations.max_order_volumes().choose(rng)?,
        weights: *variations.weights().choose(rng)?,
    })
}
