#![allow(dead_code)]

use bevy_ecs::prelude::{Entity, World};
use freight_core::ecs::{Advertisement, Order, OrderRole, RegionId, Vehicle};
use freight_core::matching::{fitness, objective, ObjectiveWeights};
use freight_core::test_helpers::{spawn_order, spawn_vehicle};

/// Spawn a vehicle already carrying one placed advertiser order of `volume`
/// units from `origin` to `destination`. Returns `(vehicle, order)`.
pub fn spawn_loaded_vehicle(
    world: &mut World,
    vehicle_id: u32,
    capacity: u32,
    order_id: u32,
    origin: RegionId,
    destination: RegionId,
    volume: u32,
) -> (Entity, Entity) {
    let vehicle_entity = spawn_vehicle(world, vehicle_id, capacity, origin);
    let order_entity = spawn_order(world, order_id, origin, destination, volume);

    let cargo = {
        let mut order = world.get_mut::<Order>(order_entity).expect("order");
        order.place(vehicle_entity).expect("place");
        order.cargo(order_entity)
    };
    let advertisement = {
        let mut vehicle = world.get_mut::<Vehicle>(vehicle_entity).expect("vehicle");
        vehicle.try_load(cargo).expect("fits");
        let value = objective(&ObjectiveWeights::default(), origin, &vehicle);
        vehicle.objective = Some(value);
        vehicle.fitness = Some(fitness(value));
        Advertisement {
            fitness: fitness(value),
            capacity: vehicle.capacity,
            load: vehicle.load.clone(),
        }
    };
    world.get_mut::<Order>(order_entity).expect("order").role =
        OrderRole::Advertiser(advertisement);
    (vehicle_entity, order_entity)
}

/// Set an order's countdown directly.
pub fn set_timer(world: &mut World, order: Entity, timer: u32) {
    world.get_mut::<Order>(order).expect("order").timer = timer;
}
