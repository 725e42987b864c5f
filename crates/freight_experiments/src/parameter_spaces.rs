//! Pre-defined parameter space configurations for experimentation.
//!
//! This module provides ready-to-use parameter space definitions that can be
//! easily selected for different types of experiments.

use freight_core::matching::ObjectiveWeights;
use freight_core::scenario::ActivationOrder;

use crate::ParameterSpace;

/// Names accepted by [`by_name`].
pub const SPACE_NAMES: [&str; 5] = ["minimal", "activation", "countdown", "fleet", "weights"];

/// Look up a pre-defined space by name.
pub fn by_name(name: &str) -> Option<ParameterSpace> {
    match name {
        "minimal" => Some(minimal_space()),
        "activation" => Some(activation_comparison_space()),
        "countdown" => Some(countdown_space()),
        "fleet" => Some(fleet_size_space()),
        "weights" => Some(objective_weights_space()),
        _ => None,
    }
}

/// Creation order vs. shuffled activation on the same seeds.
pub fn activation_comparison_space() -> ParameterSpace {
    ParameterSpace::grid()
        .activation(vec![ActivationOrder::CreationOrder, ActivationOrder::Shuffled])
        .num_vehicles(vec![10])
        .num_orders(vec![60, 120])
        .runs(10)
}

/// How long loaded vehicles wait for more orders before leaving.
pub fn countdown_space() -> ParameterSpace {
    ParameterSpace::grid()
        .order_countdown(vec![0, 5, 10, 20, 40])
        .num_vehicles(vec![10])
        .num_orders(vec![100])
        .runs(5)
}

pub fn fleet_size_space() -> ParameterSpace {
    ParameterSpace::grid()
        .num_vehicles(vec![4, 8, 16, 32])
        .num_orders(vec![100, 200])
        .max_order_volume(vec![6, 12])
        .runs(5)
}

/// Load-only scoring against scoring that also penalizes vehicles far from
/// their home region. The position term only differs once vehicles have
/// travelled, so short runs show little separation.
pub fn objective_weights_space() -> ParameterSpace {
    ParameterSpace::grid()
        .weights(vec![
            ObjectiveWeights::default(),
            ObjectiveWeights {
                load: 1.0,
                position: 0.5,
                availability: 0.0,
            },
        ])
        .num_vehicles(vec![10])
        .num_orders(vec![100])
        .runs(5)
}

pub fn minimal_space() -> ParameterSpace {
    ParameterSpace::grid()
        .num_vehicles(vec![4])
        .num_orders(vec![20])
        .runs(2)
}
