//! Fleet request: pulls an idle empty vehicle toward an origin with no vehicle present.

use bevy_ecs::prelude::{Entity, Query};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::ecs::{Order, RegionId, Vehicle};

/// Vehicles that may answer a fleet request for `origin`, by ascending id.
///
/// Eligible means standing still, empty, not already committed to another
/// request and not already at `origin`.
pub fn fleet_request_candidates<'a>(
    vehicles: impl Iterator<Item = (Entity, &'a Vehicle)>,
    origin: RegionId,
) -> Vec<Entity> {
    let mut candidates: Vec<(u32, Entity)> = vehicles
        .filter(|(_, vehicle)| {
            !vehicle.dispatched
                && !vehicle.requested
                && vehicle.load.is_empty()
                && vehicle.current_region != origin
        })
        .map(|(entity, vehicle)| (vehicle.id, entity))
        .collect();
    candidates.sort_unstable_by_key(|(id, _)| *id);
    candidates.into_iter().map(|(_, entity)| entity).collect()
}

/// Commits a random eligible vehicle to reposition to the requester's origin.
///
/// Marks the order `requesting` on success so it does not request again while
/// the vehicle is on its way. Returns the committed vehicle.
pub fn request_fleet<R: Rng + ?Sized>(
    requester: Entity,
    order: &mut Order,
    vehicles: &mut Query<(Entity, &mut Vehicle)>,
    rng: &mut R,
) -> Option<Entity> {
    let candidates = fleet_request_candidates(vehicles.iter(), order.origin);
    let chosen = *candidates.choose(rng)?;
    let (_, mut vehicle) = vehicles.get_mut(chosen).ok()?;

    vehicle.requested = true;
    vehicle.requested_by = Some(requester);
    vehicle.target_region = Some(order.origin);
    order.requesting = true;

    debug!(
        order_id = order.id,
        vehicle_id = vehicle.id,
        from = %vehicle.current_region,
        to = %order.origin,
        "fleet request"
    );
    Some(chosen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::Cargo;

    #[test]
    fn candidates_exclude_busy_loaded_and_local_vehicles() {
        let idle = Vehicle::new(4, 0, 10, RegionId(2));
        let mut traveling = Vehicle::new(1, 0, 10, RegionId(2));
        traveling.dispatched = true;
        let mut committed = Vehicle::new(2, 0, 10, RegionId(3));
        committed.requested = true;
        let mut loaded = Vehicle::new(3, 0, 10, RegionId(3));
        loaded
            .try_load(Cargo {
                order: Entity::from_raw(9),
                order_id: 9,
                origin: RegionId(3),
                destination: RegionId(4),
                volume: 2,
            })
            .expect("fits");
        let local = Vehicle::new(5, 0, 10, RegionId(1));
        let second_idle = Vehicle::new(0, 0, 10, RegionId(4));

        let fleet = [
            (Entity::from_raw(4), &idle),
            (Entity::from_raw(1), &traveling),
            (Entity::from_raw(2), &committed),
            (Entity::from_raw(3), &loaded),
            (Entity::from_raw(5), &local),
            (Entity::from_raw(6), &second_idle),
        ];
        let candidates = fleet_request_candidates(fleet.into_iter(), RegionId(1));
        assert_eq!(candidates, vec![Entity::from_raw(6), Entity::from_raw(4)]);
    }
}
