use super::combinations::ParameterCombination;
use super::{ParameterSet, ParameterSpace};

/// Spreads the seeds of different combinations apart.
const SEED_STRIDE: u64 = 0x9e37_79b9;

pub(super) fn combination_to_parameter_sets(
    space: &ParameterSpace,
    combo: ParameterCombination,
    experiment_id: usize,
) -> Vec<ParameterSet> {
    let mut params = space.base.clone();
    params.activation = combo.activation;
    params.order_countdown = combo.order_countdown;
    params.num_vehicles = combo.num_vehicles;
    params.num_orders = combo.num_orders;
    params.max_order_volume = combo.max_order_volume;
    params.weights = combo.weights;

    let experiment_seed = space
        .base_seed
        .wrapping_add((experiment_id as u64).wrapping_mul(SEED_STRIDE));

    (0..space.runs_per_combination)
        .map(|run_id| {
            ParameterSet::new(
                params.clone(),
                space.source.clone(),
                format!("exp_{experiment_id}"),
                run_id,
                experiment_seed.wrapping_add(run_id as u64),
            )
        })
        .collect()
}
