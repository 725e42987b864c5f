use crate::ecs::{RegionId, Vehicle};

/// Scores are rounded to four decimal digits so runs are reproducible.
const SCORE_SCALE: f64 = 10_000.0;

/// Weights of the objective terms. Only the load term is active by default;
/// position and availability are kept for extension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectiveWeights {
    pub load: f64,
    pub position: f64,
    pub availability: f64,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self {
            load: 1.0,
            position: 0.0,
            availability: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectiveComponents {
    /// Remaining capacity of the vehicle.
    pub load: f64,
    /// Absolute difference between the vehicle's home region index and the order origin.
    pub position: f64,
    /// Ticks until the vehicle is available; zero for a vehicle already at the origin.
    pub availability: f64,
}

impl ObjectiveComponents {
    pub fn weighted(&self, weights: &ObjectiveWeights) -> f64 {
        weights.load * self.load
            + weights.position * self.position
            + weights.availability * self.availability
    }
}

pub fn round_score(value: f64) -> f64 {
    (value * SCORE_SCALE).round() / SCORE_SCALE
}

pub fn objective_components(order_origin: RegionId, vehicle: &Vehicle) -> ObjectiveComponents {
    // Availability is only defined for a vehicle standing at the order's origin.
    // Advertisers are always promoted at their vehicle's region, so this holds for
    // every caller; anything else scores zero.
    debug_assert_eq!(
        order_origin, vehicle.current_region,
        "availability term requires the vehicle to be at the order origin"
    );
    ObjectiveComponents {
        load: vehicle.remaining_capacity() as f64,
        position: (vehicle.home_region.0 as f64 - order_origin.0 as f64).abs(),
        availability: 0.0,
    }
}

pub fn objective(weights: &ObjectiveWeights, order_origin: RegionId, vehicle: &Vehicle) -> f64 {
    round_score(objective_components(order_origin, vehicle).weighted(weights))
}

/// `1 / (1 + objective)` for a positive objective, otherwise zero.
pub fn fitness(objective: f64) -> f64 {
    if objective > 0.0 {
        round_score(1.0 / (1.0 + objective))
    } else {
        0.0
    }
}

/// Probability that an onlooker follows the best advertisement.
///
/// Returns `None` when the pool's fitness sum is zero; the probability is
/// undefined and callers treat the pool as having no eligible candidate.
pub fn selection_probability(best_fitness: f64, pool_fitness_sum: f64) -> Option<f64> {
    if pool_fitness_sum <= 0.0 {
        return None;
    }
    Some((best_fitness / pool_fitness_sum).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::Cargo;
    use bevy_ecs::prelude::Entity;

    fn vehicle_with_load(capacity: u32, loaded: u32) -> Vehicle {
        let mut vehicle = Vehicle::new(1, 0, capacity, RegionId(1));
        if loaded > 0 {
            vehicle
                .try_load(Cargo {
                    order: Entity::from_raw(1),
                    order_id: 1,
                    origin: RegionId(1),
                    destination: RegionId(2),
                    volume: loaded,
                })
                .expect("fits");
        }
        vehicle
    }

    #[test]
    fn objective_is_remaining_capacity_by_default() {
        let vehicle = vehicle_with_load(10, 4);
        let value = objective(&ObjectiveWeights::default(), RegionId(1), &vehicle);
        assert_eq!(value, 6.0);
    }

    #[test]
    fn fitness_rounds_to_four_digits() {
        assert_eq!(fitness(6.0), 0.1429);
        assert_eq!(fitness(1.0), 0.5);
    }

    #[test]
    fn full_vehicle_has_zero_fitness() {
        let vehicle = vehicle_with_load(10, 10);
        let value = objective(&ObjectiveWeights::default(), RegionId(1), &vehicle);
        assert_eq!(value, 0.0);
        assert_eq!(fitness(value), 0.0);
    }

    #[test]
    fn position_term_measures_distance_from_home_region() {
        let mut vehicle = vehicle_with_load(10, 0);
        let weights = ObjectiveWeights {
            load: 0.0,
            position: 1.0,
            availability: 0.0,
        };
        let at_home = objective_components(RegionId(1), &vehicle);
        assert_eq!(at_home.weighted(&weights), 0.0);

        vehicle.current_region = RegionId(3);
        let away = objective_components(RegionId(3), &vehicle);
        assert_eq!(away.position, 2.0);
        assert_eq!(away.weighted(&weights), 2.0);
    }

    #[test]
    fn probability_guards_zero_sum() {
        assert_eq!(selection_probability(0.0, 0.0), None);
        assert_eq!(selection_probability(0.25, 0.5), Some(0.5));
        let pr = selection_probability(0.3, 0.3).expect("defined");
        assert!((0.0..=1.0).contains(&pr));
    }
}
