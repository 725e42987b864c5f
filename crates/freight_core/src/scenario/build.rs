use bevy_ecs::prelude::World;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::clock::SimulationClock;
use crate::ecs::{Order, RegionId, Vehicle};
use crate::matching::MatchingRng;
use crate::telemetry::{FreightTelemetry, SnapshotConfig, TickSnapshots};
use crate::topology::{RegionIndex, Topology};

use super::instance::{Instance, InstanceError, OrderRecord, VehicleRecord};
use super::params::{ActivationPolicy, MatchingConfig, OrderCountdown, ScenarioParams, TickLimit};

/// Draws a destination different from `origin` when the topology allows it.
pub fn random_destination<R: Rng>(
    rng: &mut R,
    regions: &[RegionId],
    origin: RegionId,
) -> RegionId {
    let others: Vec<RegionId> = regions
        .iter()
        .copied()
        .filter(|region| *region != origin)
        .collect();
    others.choose(rng).copied().unwrap_or(origin)
}

/// Generates a random instance on the default topology.
///
/// Vehicles start in random regions and are spread round-robin over the
/// freighters. Order volumes are uniform in `1..=max_order_volume`, clamped to
/// the vehicle capacity.
pub fn generate_instance(params: &ScenarioParams) -> Instance {
    let mut rng = StdRng::seed_from_u64(params.seed.unwrap_or(0));
    let topology = Topology::default();
    let regions: Vec<RegionId> = topology.region_ids().collect();
    let freighters = params.num_freighters.max(1);
    let capacity = params.vehicle_capacity.max(1);
    let max_volume = params.max_order_volume.clamp(1, capacity);

    let vehicles = (0..params.num_vehicles)
        .map(|idx| VehicleRecord {
            id: idx as u32 + 1,
            capacity: i64::from(capacity),
            start_region: regions[rng.gen_range(0..regions.len())].0,
            freighter_id: idx as u32 % freighters,
        })
        .collect();

    let orders = (0..params.num_orders)
        .map(|idx| {
            let origin = regions[rng.gen_range(0..regions.len())];
            let destination = random_destination(&mut rng, &regions, origin);
            OrderRecord {
                id: idx as u32 + 1,
                origin: origin.0,
                destination: destination.0,
                volume: i64::from(rng.gen_range(1..=max_volume)),
            }
        })
        .collect();

    Instance {
        regions: Vec::new(),
        vehicles,
        orders,
    }
}

/// Builds a generated scenario into `world` and returns the instance it used.
pub fn build_scenario(world: &mut World, params: ScenarioParams) -> Instance {
    let instance = generate_instance(&params);
    populate_world(world, &instance, &params);
    instance
}

/// Validates `instance` and builds it into `world`. Nothing is inserted when
/// validation fails.
pub fn build_scenario_from_instance(
    world: &mut World,
    instance: &Instance,
    params: &ScenarioParams,
) -> Result<(), InstanceError> {
    instance.validate()?;
    populate_world(world, instance, params);
    Ok(())
}

fn populate_world(world: &mut World, instance: &Instance, params: &ScenarioParams) {
    let mut topology = instance.topology();
    if let Some(speed) = params.speed_per_tick {
        topology = topology.with_speed_per_tick(speed);
    }
    let seed = params.seed.unwrap_or(0);

    world.insert_resource(SimulationClock::default());
    world.insert_resource(FreightTelemetry::default());
    world.insert_resource(SnapshotConfig {
        interval_ticks: params.snapshot_interval_ticks.unwrap_or(1),
        ..Default::default()
    });
    world.insert_resource(TickSnapshots::default());
    world.insert_resource(RegionIndex::default());
    world.insert_resource(topology);
    world.insert_resource(MatchingConfig {
        weights: params.weights,
    });
    world.insert_resource(ActivationPolicy {
        order: params.activation,
    });
    world.insert_resource(OrderCountdown(params.order_countdown));
    world.insert_resource(MatchingRng::seeded(seed.wrapping_add(1)));
    if let Some(limit) = params.tick_limit {
        world.insert_resource(TickLimit(limit));
    }

    for record in &instance.vehicles {
        // Validation guarantees the capacity fits in u32.
        let capacity = u32::try_from(record.capacity).unwrap_or(u32::MAX);
        world.spawn(Vehicle::new(
            record.id,
            record.freighter_id,
            capacity,
            RegionId(record.start_region),
        ));
    }
    for record in &instance.orders {
        let volume = u32::try_from(record.volume).unwrap_or(u32::MAX);
        world.spawn(Order::new(
            record.id,
            RegionId(record.origin),
            RegionId(record.destination),
            volume,
            params.order_countdown,
        ));
    }

    info!(
        vehicles = instance.vehicles.len(),
        orders = instance.orders.len(),
        seed,
        activation = %params.activation,
        "scenario built"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::DEFAULT_ORDER_COUNTDOWN;

    #[test]
    fn generated_instances_are_valid_and_seeded() {
        let params = ScenarioParams::default().with_seed(4).with_fleet(5, 40);
        let first = generate_instance(&params);
        let second = generate_instance(&params);
        assert_eq!(first, second);
        assert_eq!(first.vehicles.len(), 5);
        assert_eq!(first.orders.len(), 40);
        first.validate().expect("generated instance validates");
        assert!(first
            .orders
            .iter()
            .all(|order| order.origin != order.destination));
    }

    #[test]
    fn build_scenario_spawns_entities_and_resources() {
        let mut world = World::new();
        let params = ScenarioParams::default().with_seed(1).with_fleet(3, 7);
        build_scenario(&mut world, params);

        assert_eq!(world.query::<&Vehicle>().iter(&world).count(), 3);
        assert_eq!(world.query::<&Order>().iter(&world).count(), 7);
        assert!(world.contains_resource::<MatchingRng>());
        assert!(world.contains_resource::<RegionIndex>());
        assert!(!world.contains_resource::<TickLimit>());
        assert!(world
            .query::<&Order>()
            .iter(&world)
            .all(|order| order.timer == DEFAULT_ORDER_COUNTDOWN));
    }

    #[test]
    fn invalid_instance_leaves_world_untouched() {
        let mut world = World::new();
        let instance = Instance {
            regions: Vec::new(),
            vehicles: Vec::new(),
            orders: vec![OrderRecord {
                id: 1,
                origin: 1,
                destination: 2,
                volume: 3,
            }],
        };
        let result =
            build_scenario_from_instance(&mut world, &instance, &ScenarioParams::default());
        assert!(matches!(result, Err(InstanceError::NoVehicles { orders: 1 })));
        assert!(!world.contains_resource::<SimulationClock>());
    }
}
