use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::clock::SimulationClock;
use crate::ecs::{Order, Vehicle};
use crate::telemetry::{FleetCounts, SnapshotConfig, TickSnapshot, TickSnapshots};

pub fn capture_snapshot_system(
    clock: Res<SimulationClock>,
    config: Res<SnapshotConfig>,
    mut snapshots: ResMut<TickSnapshots>,
    orders: Query<&Order>,
    vehicles: Query<&Vehicle>,
) {
    // Interval check is done via schedule condition, but keep for direct callers
    let now = clock.now();
    let should_capture = match snapshots.last_snapshot_at {
        None => true,
        Some(last) => now.saturating_sub(last) >= config.interval_ticks,
    };
    if !should_capture {
        return;
    }

    let mut counts = FleetCounts::default();
    for order in orders.iter() {
        counts.add_order(order);
    }
    for vehicle in vehicles.iter() {
        counts.add_vehicle(vehicle.state());
    }

    snapshots.last_snapshot_at = Some(now);
    snapshots.snapshots.push_back(TickSnapshot { tick: now, counts });

    if snapshots.snapshots.len() > config.max_snapshots {
        snapshots.snapshots.pop_front();
    }
}
