//! Simulation runner: advances the clock and routes events into the ECS.
//!
//! Clock progression and event routing happen here, outside systems. Each step
//! pops the next event from [SimulationClock], inserts it as [CurrentEvent],
//! then runs the schedule.

use bevy_ecs::prelude::Res;
use bevy_ecs::prelude::{Schedule, World};
use bevy_ecs::schedule::IntoSystemConfigs;
use tracing::warn;

use crate::clock::{CurrentEvent, Event, EventKind, SimulationClock};
use crate::scenario::TickLimit;
use crate::systems::{
    completion::completion_system, order_matching::order_matching_system,
    region_index::update_region_index_system, telemetry_snapshot::capture_snapshot_system,
    vehicle_arrival::vehicle_arrival_system, vehicle_dispatch::vehicle_dispatch_system,
};
use crate::telemetry::{SnapshotConfig, TickSnapshots};

fn is_tick(event: Option<Res<CurrentEvent>>) -> bool {
    event.map(|e| e.0.kind == EventKind::Tick).unwrap_or(false)
}

fn is_vehicle_arrived(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::VehicleArrived)
        .unwrap_or(false)
}

/// Condition: telemetry snapshot interval has elapsed.
fn should_capture_snapshot(
    clock: Option<Res<SimulationClock>>,
    config: Option<Res<SnapshotConfig>>,
    snapshots: Option<Res<TickSnapshots>>,
) -> bool {
    let (Some(clock), Some(config), Some(snapshots)) = (clock, config, snapshots) else {
        return false;
    };

    match snapshots.last_snapshot_at {
        None => true,
        Some(last) => clock.now().saturating_sub(last) >= config.interval_ticks,
    }
}

/// Pops the next event unless it is at or past [TickLimit].
fn pop_within_limit(world: &mut World) -> Option<Event> {
    let limit = world.get_resource::<TickLimit>().map(|limit| limit.0);
    let next_tick = world
        .get_resource::<SimulationClock>()
        .and_then(|clock| clock.next_event_time());
    if let (Some(limit), Some(tick)) = (limit, next_tick) {
        if tick >= limit {
            warn!(limit, pending_tick = tick, "tick limit reached");
            return None;
        }
    }

    let event = world.get_resource_mut::<SimulationClock>()?.pop_next()?;
    world.insert_resource(CurrentEvent(event));
    Some(event)
}

/// Runs one simulation step: pops the next event, inserts it as [CurrentEvent], then runs the schedule.
/// Returns `true` if an event was processed, `false` if the clock was empty or if the next event
/// is at or past [TickLimit] (when that resource is present).
pub fn run_next_event(world: &mut World, schedule: &mut Schedule) -> bool {
    if pop_within_limit(world).is_none() {
        return false;
    }
    schedule.run(world);
    true
}

/// Runs one simulation step and invokes `hook` after the schedule completes.
pub fn run_next_event_with_hook<F>(world: &mut World, schedule: &mut Schedule, mut hook: F) -> bool
where
    F: FnMut(&World, &Event),
{
    let Some(event) = pop_within_limit(world) else {
        return false;
    };
    schedule.run(world);
    hook(world, &event);
    true
}

/// Runs simulation steps until the event queue is empty or `max_steps` is reached.
/// Returns the number of steps executed.
pub fn run_until_empty(world: &mut World, schedule: &mut Schedule, max_steps: usize) -> usize {
    let mut steps = 0;
    while steps < max_steps && run_next_event(world, schedule) {
        steps += 1;
    }
    steps
}

/// Runs simulation steps until empty and invokes `hook` after each step.
pub fn run_until_empty_with_hook<F>(
    world: &mut World,
    schedule: &mut Schedule,
    max_steps: usize,
    mut hook: F,
) -> usize
where
    F: FnMut(&World, &Event),
{
    let mut steps = 0;
    while steps < max_steps && run_next_event_with_hook(world, schedule, &mut hook) {
        steps += 1;
    }
    steps
}

/// Builds the simulation schedule.
///
/// Arrivals are handled on their own event. A tick runs the region index
/// rebuild, order matching, vehicle dispatch and the completion check in that
/// order, then captures a snapshot when the interval has elapsed.
pub fn simulation_schedule() -> Schedule {
    let mut schedule = Schedule::default();

    schedule.add_systems(vehicle_arrival_system.run_if(is_vehicle_arrived));

    schedule.add_systems(
        (
            update_region_index_system,
            order_matching_system,
            vehicle_dispatch_system,
            completion_system,
            capture_snapshot_system.run_if(should_capture_snapshot),
        )
            .chain()
            .run_if(is_tick),
    );

    schedule
}

/// Initializes the simulation by scheduling the first tick at 0.
/// Call this after building the scenario and before running events.
pub fn initialize_simulation(world: &mut World) {
    let mut clock = world.resource_mut::<SimulationClock>();
    clock.schedule_at(0, EventKind::Tick, None);
}
