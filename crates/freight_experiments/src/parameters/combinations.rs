use freight_core::matching::ObjectiveWeights;
use freight_core::scenario::ActivationOrder;

use super::ParameterSpace;

/// Represents a single parameter combination.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct ParameterCombination {
    pub(super) activation: ActivationOrder,
    pub(super) order_countdown: u32,
    pub(super) num_vehicles: usize,
    pub(super) num_orders: usize,
    pub(super) max_order_volume: u32,
    pub(super) weights: ObjectiveWeights,
}

/// Holds all parameter variations to explore, with base values filled in for
/// dimensions the space leaves unset.
pub(super) struct ParameterVariations {
    activations: Vec<ActivationOrder>,
    order_countdowns: Vec<u32>,
    num_vehicles: Vec<usize>,
    num_orders: Vec<usize>,
    max_order_volumes: Vec<u32>,
    weights: Vec<ObjectiveWeights>,
}

fn or_base<T: Clone>(values: &[T], base: T) -> Vec<T> {
    if values.is_empty() {
        vec![base]
    } else {
        values.to_vec()
    }
}

impl ParameterVariations {
    pub(super) fn from_space(space: &ParameterSpace) -> Self {
        let base = &space.base;
        Self {
            activations: or_base(&space.activations, base.activation),
            order_countdowns: or_base(&space.order_countdowns, base.order_countdown),
            num_vehicles: or_base(&space.num_vehicles, base.num_vehicles),
            num_orders: or_base(&space.num_orders, base.num_orders),
            max_order_volumes: or_base(&space.max_order_volumes, base.max_order_volume),
            weights: or_base(&space.weights, base.weights),
        }
    }

    /// Generate all combinations using Cartesian product.
    pub(super) fn generate_combinations(&self) -> impl Iterator<Item = ParameterCombination> + '_ {
        self.activations.iter().flat_map(move |&activation| {
            self.order_countdowns.iter().flat_map(move |&order_countdown| {
                self.num_vehicles.iter().flat_map(move |&num_vehicles| {
                    self.num_orders.iter().flat_map(move |&num_orders| {
                        self.max_order_volumes
                            .iter()
                            .flat_map(move |&max_order_volume| {
                                self.weights.iter().map(move |&weights| ParameterCombination {
                                    activation,
                                    order_countdown,
                                    num_vehicles,
                                    num_orders,
                                    max_order_volume,
                                    weights,
                                })
                            })
                    })
                })
            })
        })
    }

    pub(super) fn activations(&self) -> &[ActivationOrder] {
        &self.activations
    }

    pub(super) fn order_countdowns(&self) -> &[u32] {
        &self.order_countdowns
    }

    pub(super) fn num_vehicles(&self) -> &[usize] {
        &self.num_vehicles
    }

    pub(super) fn num_orders(&self) -> &[usize] {
        &self.num_orders
    }

    pub(super) fn max_order_volumes(&self) -> &[u32] {
        &self.max_order_volumes
    }

    pub(super) fn weights(&self) -> &[ObjectiveWeights] {
        &self.weights
    }
}
