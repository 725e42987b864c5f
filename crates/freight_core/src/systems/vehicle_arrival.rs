//! Vehicle arrival system: ends a trip, delivering the load or finishing a reposition.

use bevy_ecs::prelude::{Query, Res, ResMut};
use tracing::{debug, info, warn};

use crate::clock::{CurrentEvent, EventKind, EventSubject, SimulationClock};
use crate::ecs::{Order, Vehicle};
use crate::telemetry::{DeliveryRecord, FreightTelemetry};

pub fn vehicle_arrival_system(
    event: Res<CurrentEvent>,
    clock: Res<SimulationClock>,
    mut telemetry: ResMut<FreightTelemetry>,
    mut orders: Query<&mut Order>,
    mut vehicles: Query<&mut Vehicle>,
) {
    if event.0.kind != EventKind::VehicleArrived {
        return;
    }
    let Some(EventSubject::Vehicle(entity)) = event.0.subject else {
        return;
    };
    let Ok(mut vehicle) = vehicles.get_mut(entity) else {
        return;
    };
    let Some(target) = vehicle.target_region else {
        warn!(vehicle_id = vehicle.id, "arrival for a vehicle with no target");
        return;
    };
    let now = clock.now();

    if vehicle.requested {
        vehicle.requested = false;
        if let Some(requester) = vehicle.requested_by.take() {
            if let Ok(mut order) = orders.get_mut(requester) {
                if !order.placed {
                    order.requesting = false;
                }
            }
        }
        debug!(vehicle_id = vehicle.id, region = %target, "reposition complete");
    } else {
        let load = std::mem::take(&mut vehicle.load);
        let delivered = load.len();
        for cargo in load {
            if let Ok(mut order) = orders.get_mut(cargo.order) {
                order.mark_delivered();
            }
            telemetry.deliveries.push(DeliveryRecord {
                tick: now,
                order_id: cargo.order_id,
                origin: cargo.origin,
                destination: cargo.destination,
                vehicle_id: vehicle.id,
                volume: cargo.volume,
            });
        }
        info!(vehicle_id = vehicle.id, region = %target, delivered, "load delivered");
    }

    vehicle.current_region = target;
    vehicle.target_region = None;
    vehicle.dispatched = false;
    vehicle.objective = None;
    vehicle.fitness = None;
}
