mod support;

use bevy_ecs::prelude::{Schedule, World};
use freight_core::clock::SimulationClock;
use freight_core::systems::vehicle_dispatch::vehicle_dispatch_system;
use freight_core::telemetry::FreightTelemetry;
use freight_core::test_helpers::{order, spawn_order, vehicle, GRAZ, KLAGENFURT, WIEN};

use support::entities::{set_timer, spawn_loaded_vehicle};
use support::schedule::ScheduleRunner;
use support::world::TestWorldBuilder;

fn run_dispatch(world: &mut World) {
    let mut schedule = Schedule::default();
    schedule.add_systems(vehicle_dispatch_system);
    schedule.run(world);
}

#[test]
fn due_order_sends_vehicle_despite_waiting_orders() {
    let mut world = TestWorldBuilder::new().build();
    let (truck, loaded) = spawn_loaded_vehicle(&mut world, 1, 10, 1, KLAGENFURT, GRAZ, 4);
    spawn_order(&mut world, 2, KLAGENFURT, GRAZ, 2);
    set_timer(&mut world, loaded, 0);

    run_dispatch(&mut world);

    let truck_state = vehicle(&world, truck);
    assert!(truck_state.dispatched);
    assert_eq!(truck_state.target_region, Some(GRAZ));
    let telemetry = world.resource::<FreightTelemetry>();
    assert_eq!(telemetry.dispatches.len(), 1);
    assert_eq!(telemetry.dispatches[0].order_ids, vec![1]);
    assert_eq!(telemetry.dispatches[0].total_volume, 4);
    assert_eq!(
        world.resource::<SimulationClock>().next_event_time(),
        Some(23)
    );
}

#[test]
fn vehicle_keeps_collecting_while_orders_can_still_join() {
    let mut world = TestWorldBuilder::new().build();
    let (truck, loaded) = spawn_loaded_vehicle(&mut world, 1, 10, 1, KLAGENFURT, GRAZ, 4);
    spawn_order(&mut world, 2, KLAGENFURT, GRAZ, 2);
    set_timer(&mut world, loaded, 5);

    run_dispatch(&mut world);

    assert!(!vehicle(&world, truck).dispatched);
    assert!(world.resource::<FreightTelemetry>().dispatches.is_empty());
    assert!(world.resource::<SimulationClock>().is_empty());
}

#[test]
fn vehicle_departs_when_nothing_else_is_waiting() {
    let mut world = TestWorldBuilder::new().build();
    let (truck, _) = spawn_loaded_vehicle(&mut world, 1, 10, 1, KLAGENFURT, GRAZ, 4);
    // Same origin, other destination: not something the vehicle waits for.
    spawn_order(&mut world, 2, KLAGENFURT, WIEN, 2);

    run_dispatch(&mut world);

    assert!(vehicle(&world, truck).dispatched);
}

#[test]
fn dispatched_vehicle_delivers_on_arrival() {
    let mut world = TestWorldBuilder::new().build();
    let (truck, loaded) = spawn_loaded_vehicle(&mut world, 1, 10, 1, KLAGENFURT, GRAZ, 4);

    let mut runner = ScheduleRunner::new();
    runner.start(&mut world);
    let steps = runner.run_checked(&mut world, 1_000);
    assert!(steps < 1_000);

    let delivered = order(&world, loaded);
    assert!(delivered.delivered);
    assert!(!delivered.is_advertiser());

    let truck_state = vehicle(&world, truck);
    assert_eq!(truck_state.current_region, GRAZ);
    assert!(truck_state.load.is_empty());
    assert!(!truck_state.dispatched);
    assert_eq!(truck_state.fitness, None);

    let telemetry = world.resource::<FreightTelemetry>();
    assert_eq!(telemetry.deliveries.len(), 1);
    assert_eq!(telemetry.deliveries[0].tick, 23);
    let termination = telemetry.termination.expect("terminated");
    assert_eq!(termination.tick, 23);
    assert_eq!(termination.delivered_orders, 1);
}
