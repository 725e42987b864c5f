//! Region index update system: rebuilds region -> vehicle lists before matching.

use bevy_ecs::prelude::{Entity, Query, ResMut};

use crate::ecs::{RegionId, Vehicle};
use crate::topology::RegionIndex;

/// Rebuilds the region index from every vehicle that is not on the road.
/// Only runs if the RegionIndex resource exists.
pub fn update_region_index_system(
    index: Option<ResMut<RegionIndex>>,
    vehicles: Query<(Entity, &Vehicle)>,
) {
    let Some(mut index) = index else {
        return;
    };

    let mut stationary: Vec<(u32, RegionId, Entity)> = vehicles
        .iter()
        .filter(|(_, vehicle)| !vehicle.dispatched)
        .map(|(entity, vehicle)| (vehicle.id, vehicle.current_region, entity))
        .collect();
    stationary.sort_unstable_by_key(|(id, _, _)| *id);

    index.clear();
    for (_, region, entity) in stationary {
        index.insert(region, entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::prelude::{Schedule, World};

    #[test]
    fn dispatched_vehicles_leave_the_index() {
        let mut world = World::new();
        world.insert_resource(RegionIndex::default());
        let late = world.spawn(Vehicle::new(7, 0, 10, RegionId(1))).id();
        let early = world.spawn(Vehicle::new(2, 0, 10, RegionId(1))).id();
        let mut away = Vehicle::new(3, 0, 10, RegionId(1));
        away.dispatched = true;
        world.spawn(away);

        let mut schedule = Schedule::default();
        schedule.add_systems(update_region_index_system);
        schedule.run(&mut world);

        let index = world.resource::<RegionIndex>();
        assert_eq!(index.vehicles_at(RegionId(1)), &[early, late]);
    }
}
