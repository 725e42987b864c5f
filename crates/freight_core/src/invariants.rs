//! World-level consistency checks between orders and vehicles.
//!
//! Cheap enough to run after every event in tests and debug runs.

use std::collections::{HashMap, HashSet};

use bevy_ecs::prelude::{Entity, World};
use thiserror::Error;

use crate::ecs::{Order, Vehicle};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("vehicle {vehicle_id} carries {loaded} units over capacity {capacity}")]
    CapacityExceeded {
        vehicle_id: u32,
        capacity: u32,
        loaded: u32,
    },
    #[error("vehicle {vehicle_id} carries orders for more than one destination")]
    MixedDestinations { vehicle_id: u32 },
    #[error("vehicle {vehicle_id} carries order {order_id} more than once")]
    DuplicateCargo { vehicle_id: u32, order_id: u32 },
    #[error("vehicle {vehicle_id} has {count} advertiser orders")]
    MultipleAdvertisers { vehicle_id: u32, count: usize },
    #[error("order {order_id} is inconsistent with its vehicle: {detail}")]
    PlacementMismatch { order_id: u32, detail: &'static str },
}

/// Checks capacity, single destination, advertiser uniqueness and that every
/// placed order and every loaded cargo agree with each other.
pub fn check_world(world: &World) -> Result<(), InvariantViolation> {
    let mut orders: HashMap<Entity, &Order> = HashMap::new();
    let mut vehicles: HashMap<Entity, &Vehicle> = HashMap::new();
    let entities: Vec<Entity> = world.iter_entities().map(|entity| entity.id()).collect();
    for entity in entities {
        if let Some(order) = world.get::<Order>(entity) {
            orders.insert(entity, order);
        }
        if let Some(vehicle) = world.get::<Vehicle>(entity) {
            vehicles.insert(entity, vehicle);
        }
    }

    for vehicle in vehicles.values() {
        check_vehicle(vehicle, &orders)?;
    }
    for (entity, order) in &orders {
        check_order(*entity, order, &vehicles)?;
    }
    Ok(())
}

fn check_vehicle(
    vehicle: &Vehicle,
    orders: &HashMap<Entity, &Order>,
) -> Result<(), InvariantViolation> {
    let loaded = vehicle.loaded_volume();
    if loaded > vehicle.capacity {
        return Err(InvariantViolation::CapacityExceeded {
            vehicle_id: vehicle.id,
            capacity: vehicle.capacity,
            loaded,
        });
    }

    if let Some(destination) = vehicle.load_destination() {
        if vehicle.load.iter().any(|cargo| cargo.destination != destination) {
            return Err(InvariantViolation::MixedDestinations {
                vehicle_id: vehicle.id,
            });
        }
    }

    let mut seen = HashSet::new();
    let mut advertisers = 0;
    for cargo in &vehicle.load {
        if !seen.insert(cargo.order) {
            return Err(InvariantViolation::DuplicateCargo {
                vehicle_id: vehicle.id,
                order_id: cargo.order_id,
            });
        }
        if orders.get(&cargo.order).is_some_and(|order| order.is_advertiser()) {
            advertisers += 1;
        }
    }
    if advertisers > 1 {
        return Err(InvariantViolation::MultipleAdvertisers {
            vehicle_id: vehicle.id,
            count: advertisers,
        });
    }
    Ok(())
}

fn check_order(
    entity: Entity,
    order: &Order,
    vehicles: &HashMap<Entity, &Vehicle>,
) -> Result<(), InvariantViolation> {
    let mismatch = |detail| InvariantViolation::PlacementMismatch {
        order_id: order.id,
        detail,
    };

    match (order.placed, order.vehicle) {
        (false, Some(_)) => return Err(mismatch("unplaced order references a vehicle")),
        (true, None) => return Err(mismatch("placed order has no vehicle")),
        (false, None) if order.delivered => return Err(mismatch("delivered without placement")),
        (false, None) => return Ok(()),
        (true, Some(_)) => {}
    }
    if order.delivered {
        if order.is_advertiser() {
            return Err(mismatch("delivered order still advertises"));
        }
        return Ok(());
    }

    let carried = order
        .vehicle
        .and_then(|vehicle| vehicles.get(&vehicle))
        .is_some_and(|vehicle| vehicle.load.iter().any(|cargo| cargo.order == entity));
    if !carried {
        return Err(mismatch("placed order is not in its vehicle's load"));
    }
    Ok(())
}
