//! Test helpers for common test setup and utilities.
//!
//! This module provides shared test utilities to reduce duplication across test files.

use bevy_ecs::prelude::{Entity, World};

use crate::clock::SimulationClock;
use crate::ecs::{Order, RegionId, Vehicle};
use crate::matching::MatchingRng;
use crate::scenario::{ActivationOrder, ActivationPolicy, MatchingConfig, OrderCountdown};
use crate::telemetry::{FreightTelemetry, SnapshotConfig, TickSnapshots};
use crate::topology::{RegionIndex, Topology};

/// Region ids of the default topology, named for readable tests.
pub const KLAGENFURT: RegionId = RegionId(1);
pub const GRAZ: RegionId = RegionId(2);
pub const WIEN: RegionId = RegionId(3);
pub const SALZBURG: RegionId = RegionId(4);

/// Create a basic test world with essential resources.
///
/// This is a convenience function for tests that need a minimal world setup.
/// For more complex scenarios, use the full `build_scenario` function.
pub fn create_test_world(seed: u64) -> World {
    let mut world = World::new();
    world.insert_resource(SimulationClock::default());
    world.insert_resource(FreightTelemetry::default());
    world.insert_resource(SnapshotConfig::default());
    world.insert_resource(TickSnapshots::default());
    world.insert_resource(RegionIndex::default());
    world.insert_resource(Topology::default());
    world.insert_resource(MatchingConfig::default());
    world.insert_resource(ActivationPolicy {
        order: ActivationOrder::CreationOrder,
    });
    world.insert_resource(OrderCountdown::default());
    world.insert_resource(MatchingRng::seeded(seed));
    world
}

/// Spawn an unplaced order using the world's [OrderCountdown].
pub fn spawn_order(
    world: &mut World,
    id: u32,
    origin: RegionId,
    destination: RegionId,
    volume: u32,
) -> Entity {
    let countdown = world
        .get_resource::<OrderCountdown>()
        .copied()
        .unwrap_or_default()
        .0;
    world
        .spawn(Order::new(id, origin, destination, volume, countdown))
        .id()
}

/// Spawn an empty, collecting vehicle.
pub fn spawn_vehicle(world: &mut World, id: u32, capacity: u32, region: RegionId) -> Entity {
    world.spawn(Vehicle::new(id, 0, capacity, region)).id()
}

pub fn order(world: &World, entity: Entity) -> &Order {
    world.get::<Order>(entity).expect("order entity")
}

pub fn vehicle(world: &World, entity: Entity) -> &Vehicle {
    world.get::<Vehicle>(entity).expect("vehicle entity")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawned_orders_use_world_countdown() {
        let mut world = create_test_world(1);
        world.insert_resource(OrderCountdown(3));
        let entity = spawn_order(&mut world, 1, GRAZ, WIEN, 2);
        assert_eq!(order(&world, entity).timer, 3);
    }

    #[test]
    fn named_regions_exist_in_default_topology() {
        let topology = Topology::default();
        for region in [KLAGENFURT, GRAZ, WIEN, SALZBURG] {
            assert!(topology.contains(region));
        }
    }
}
