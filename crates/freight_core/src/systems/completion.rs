//! Completion check: ends the run once every order is delivered, otherwise
//! schedules the next tick.

use bevy_ecs::prelude::{Query, ResMut};
use tracing::info;

use crate::clock::{EventKind, SimulationClock};
use crate::ecs::Order;
use crate::telemetry::{FreightTelemetry, TerminationRecord};

pub fn completion_system(
    mut clock: ResMut<SimulationClock>,
    mut telemetry: ResMut<FreightTelemetry>,
    orders: Query<&Order>,
) {
    if telemetry.is_terminated() {
        return;
    }

    let total = orders.iter().count();
    let delivered = orders.iter().filter(|order| order.delivered).count();
    if delivered == total {
        let tick = clock.now();
        telemetry.termination = Some(TerminationRecord {
            tick,
            delivered_orders: delivered,
        });
        info!(tick, delivered, "all orders delivered");
        return;
    }

    clock.schedule_in(1, EventKind::Tick, None);
}
