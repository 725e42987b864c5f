mod support;

use bevy_ecs::prelude::World;
use freight_core::clock::SimulationClock;
use freight_core::ecs::{Order, Vehicle};
use freight_core::matching::MatchPhase;
use freight_core::scenario::{
    build_scenario, ActivationOrder, ScenarioParams, DEFAULT_VEHICLE_CAPACITY,
};
use freight_core::telemetry::{DeliveryRecord, FreightTelemetry};

use support::schedule::ScheduleRunner;

fn run_generated(params: ScenarioParams) -> World {
    let mut world = World::new();
    build_scenario(&mut world, params);
    let mut runner = ScheduleRunner::new();
    runner.start(&mut world);
    runner.run_checked(&mut world, 200_000);
    world
}

fn delivery_log(world: &World) -> Vec<DeliveryRecord> {
    world.resource::<FreightTelemetry>().deliveries.clone()
}

#[test]
fn every_order_is_delivered_exactly_once() {
    let world = run_generated(
        ScenarioParams::default()
            .with_seed(21)
            .with_fleet(8, 60)
            .with_tick_limit(10_000),
    );

    let telemetry = world.resource::<FreightTelemetry>();
    let termination = telemetry.termination.expect("run terminates");
    assert_eq!(termination.delivered_orders, 60);

    let mut delivered: Vec<u32> = telemetry.deliveries.iter().map(|d| d.order_id).collect();
    delivered.sort_unstable();
    assert_eq!(delivered, (1..=60).collect::<Vec<_>>());
    assert_eq!(telemetry.placements.len(), 60);

    // Termination is observed in the tick of the last delivery.
    let last_delivery = telemetry.deliveries.iter().map(|d| d.tick).max();
    assert_eq!(last_delivery, Some(termination.tick));
}

#[test]
fn dispatches_carry_a_single_destination_within_capacity() {
    let world = run_generated(ScenarioParams::default().with_seed(5).with_fleet(5, 40));
    let telemetry = world.resource::<FreightTelemetry>();
    assert!(telemetry.is_terminated());

    for dispatch in &telemetry.dispatches {
        assert!(dispatch.total_volume <= DEFAULT_VEHICLE_CAPACITY);
        assert_ne!(dispatch.origin_region, dispatch.destination_region);
    }
    for delivery in &telemetry.deliveries {
        assert_ne!(delivery.origin, delivery.destination);
    }
}

#[test]
fn identical_seeds_reproduce_the_run() {
    let params = ScenarioParams::default().with_seed(99).with_fleet(6, 45);
    let first = run_generated(params.clone());
    let second = run_generated(params);

    assert_eq!(delivery_log(&first), delivery_log(&second));
    let first_telemetry = first.resource::<FreightTelemetry>();
    let second_telemetry = second.resource::<FreightTelemetry>();
    assert_eq!(first_telemetry.placements, second_telemetry.placements);
    assert_eq!(first_telemetry.termination, second_telemetry.termination);
}

#[test]
fn shuffled_activation_still_completes() {
    let world = run_generated(
        ScenarioParams::default()
            .with_seed(8)
            .with_fleet(6, 50)
            .with_activation(ActivationOrder::Shuffled),
    );

    let telemetry = world.resource::<FreightTelemetry>();
    assert_eq!(
        telemetry.termination.map(|t| t.delivered_orders),
        Some(50)
    );
    assert!(telemetry.placements_in_phase(MatchPhase::Scout) > 0);
}

#[test]
fn consolidation_places_some_orders_through_onlookers() {
    let world = run_generated(
        ScenarioParams {
            max_order_volume: 4,
            ..ScenarioParams::default()
        }
        .with_seed(13)
        .with_fleet(4, 80),
    );

    let telemetry = world.resource::<FreightTelemetry>();
    assert!(telemetry.is_terminated());
    assert!(telemetry.placements_in_phase(MatchPhase::Onlooker) > 0);
    assert!(telemetry
        .dispatches
        .iter()
        .any(|dispatch| dispatch.order_ids.len() > 1));
}

#[test]
fn tick_limit_stops_an_unfinished_run() {
    let mut world = run_generated(
        ScenarioParams::default()
            .with_seed(2)
            .with_fleet(4, 40)
            .with_tick_limit(5),
    );

    let telemetry = world.resource::<FreightTelemetry>();
    assert!(!telemetry.is_terminated());
    assert!(world.resource::<SimulationClock>().now() < 5);

    let undelivered = world
        .query::<&Order>()
        .iter(&world)
        .filter(|order| !order.delivered)
        .count();
    assert!(undelivered > 0);
}

#[test]
fn vehicles_end_idle_and_empty() {
    let mut world = run_generated(ScenarioParams::default().with_seed(31).with_fleet(7, 35));
    assert!(world.resource::<FreightTelemetry>().is_terminated());
    for vehicle in world.query::<&Vehicle>().iter(&world) {
        assert!(vehicle.load.is_empty());
        assert!(!vehicle.dispatched);
        assert!(!vehicle.requested);
    }
}
