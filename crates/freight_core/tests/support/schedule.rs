#![allow(dead_code)]

use bevy_ecs::prelude::World;
use bevy_ecs::schedule::Schedule;
use freight_core::clock::SimulationClock;
use freight_core::invariants::check_world;
use freight_core::runner::{
    initialize_simulation, run_next_event, run_until_empty, run_until_empty_with_hook,
    simulation_schedule,
};

/// Helper that owns a reusable `Schedule` so tests can step or drain the event queue.
pub struct ScheduleRunner {
    schedule: Schedule,
}

impl Default for ScheduleRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleRunner {
    /// Create a runner with the default simulation schedule.
    pub fn new() -> Self {
        Self {
            schedule: simulation_schedule(),
        }
    }

    /// Schedule the first tick. Call once after spawning entities.
    pub fn start(&mut self, world: &mut World) {
        initialize_simulation(world);
    }

    /// Run a single event (returns `true` if an event was processed).
    pub fn run_one(&mut self, world: &mut World) -> bool {
        run_next_event(world, &mut self.schedule)
    }

    /// Run multiple events up to `max_steps`, returning the number of steps executed.
    pub fn run_until_empty(&mut self, world: &mut World, max_steps: usize) -> usize {
        run_until_empty(world, &mut self.schedule, max_steps)
    }

    /// Run every event scheduled at or before `tick`.
    pub fn run_through_tick(&mut self, world: &mut World, tick: u64) {
        while world
            .resource::<SimulationClock>()
            .next_event_time()
            .is_some_and(|next| next <= tick)
        {
            self.run_one(world);
        }
    }

    /// Drain the queue, checking world invariants after every event.
    pub fn run_checked(&mut self, world: &mut World, max_steps: usize) -> usize {
        run_until_empty_with_hook(world, &mut self.schedule, max_steps, |world, event| {
            if let Err(violation) = check_world(world) {
                panic!("invariant broken at tick {}: {violation}", event.timestamp);
            }
        })
    }
}
