//! Vehicle dispatch system: collecting vehicles decide whether to depart.
//!
//! Runs after order matching so the waiting set reflects this tick's placements.
//! Requested vehicles leave empty for the requester's origin.

use bevy_ecs::prelude::{Entity, Query, Res, ResMut};
use tracing::{info, warn};

use crate::clock::{EventKind, EventSubject, SimulationClock};
use crate::dispatch::{dispatch_readiness, Readiness, WaitingOrder};
use crate::ecs::{Order, Vehicle};
use crate::telemetry::{DispatchRecord, FreightTelemetry};
use crate::topology::Topology;

pub fn vehicle_dispatch_system(
    mut clock: ResMut<SimulationClock>,
    topology: Res<Topology>,
    mut telemetry: ResMut<FreightTelemetry>,
    orders: Query<&Order>,
    mut vehicles: Query<(Entity, &mut Vehicle)>,
) {
    let now = clock.now();
    let waiting: Vec<WaitingOrder> = orders
        .iter()
        .filter(|order| !order.placed)
        .map(|order| WaitingOrder {
            origin: order.origin,
            destination: order.destination,
            volume: order.volume,
        })
        .collect();

    let mut collecting: Vec<(u32, Entity)> = vehicles
        .iter()
        .filter(|(_, vehicle)| !vehicle.dispatched)
        .map(|(entity, vehicle)| (vehicle.id, entity))
        .collect();
    collecting.sort_unstable_by_key(|(id, _)| *id);

    for (_, entity) in collecting {
        let Ok((_, mut vehicle)) = vehicles.get_mut(entity) else {
            continue;
        };

        let destination = if vehicle.requested {
            let Some(target) = vehicle.target_region else {
                warn!(vehicle_id = vehicle.id, "requested vehicle has no target");
                vehicle.requested = false;
                vehicle.requested_by = None;
                continue;
            };
            target
        } else {
            if vehicle.load.is_empty() {
                continue;
            }
            let any_due = vehicle
                .load
                .iter()
                .any(|cargo| orders.get(cargo.order).is_ok_and(|order| order.is_due()));
            let Readiness::Ready(trigger) = dispatch_readiness(&vehicle, &waiting, any_due) else {
                continue;
            };
            let Some(destination) = vehicle.load_destination() else {
                continue;
            };
            info!(
                vehicle_id = vehicle.id,
                from = %vehicle.current_region,
                to = %destination,
                orders = vehicle.load.len(),
                volume = vehicle.loaded_volume(),
                ?trigger,
                "vehicle dispatched"
            );
            destination
        };

        let record = DispatchRecord {
            tick: now,
            vehicle_id: vehicle.id,
            origin_region: vehicle.current_region,
            destination_region: destination,
            order_ids: vehicle.load.iter().map(|cargo| cargo.order_id).collect(),
            total_volume: vehicle.loaded_volume(),
        };
        if record.is_reposition() {
            info!(
                vehicle_id = vehicle.id,
                from = %vehicle.current_region,
                to = %destination,
                "vehicle repositioning"
            );
        }

        let travel = topology.travel_ticks(vehicle.current_region, destination);
        vehicle.target_region = Some(destination);
        vehicle.dispatched = true;
        clock.schedule_in(
            travel,
            EventKind::VehicleArrived,
            Some(EventSubject::Vehicle(entity)),
        );
        telemetry.dispatches.push(record);
    }
}
