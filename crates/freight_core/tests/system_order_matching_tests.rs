mod support;

use freight_core::matching::{DeferralReason, MatchPhase, ObjectiveWeights};
use freight_core::telemetry::FreightTelemetry;
use freight_core::test_helpers::{
    order, spawn_order, spawn_vehicle, vehicle, GRAZ, KLAGENFURT, WIEN,
};

use support::schedule::ScheduleRunner;
use support::world::TestWorldBuilder;

fn placement_phases(telemetry: &FreightTelemetry) -> Vec<MatchPhase> {
    telemetry.placements.iter().map(|record| record.phase).collect()
}

#[test]
fn second_order_follows_the_advertised_vehicle() {
    let mut world = TestWorldBuilder::new().with_seed(3).build();
    let truck = spawn_vehicle(&mut world, 1, 10, KLAGENFURT);
    let first = spawn_order(&mut world, 1, KLAGENFURT, GRAZ, 4);
    let second = spawn_order(&mut world, 2, KLAGENFURT, GRAZ, 5);

    let mut runner = ScheduleRunner::new();
    runner.start(&mut world);
    assert!(runner.run_one(&mut world));

    assert_eq!(order(&world, first).vehicle, Some(truck));
    assert_eq!(order(&world, second).vehicle, Some(truck));
    assert!(order(&world, first).is_advertiser());
    assert!(!order(&world, second).is_advertiser());

    let advertisement = order(&world, first).advertisement().expect("advertisement");
    assert_eq!(advertisement.load.len(), 2);
    assert_eq!(advertisement.advertised_volume(), 9);
    assert!((advertisement.fitness - 0.5).abs() < 1e-9);

    let truck_state = vehicle(&world, truck);
    assert_eq!(truck_state.loaded_volume(), 9);
    assert_eq!(truck_state.objective, Some(1.0));
    assert_eq!(truck_state.fitness, Some(0.5));

    let telemetry = world.resource::<FreightTelemetry>();
    assert_eq!(
        placement_phases(telemetry),
        vec![MatchPhase::Scout, MatchPhase::Onlooker]
    );
}

#[test]
fn promotion_scores_the_first_order_on_a_vehicle() {
    let mut world = TestWorldBuilder::new().build();
    let truck = spawn_vehicle(&mut world, 1, 10, KLAGENFURT);
    let first = spawn_order(&mut world, 1, KLAGENFURT, GRAZ, 4);

    let mut runner = ScheduleRunner::new();
    runner.start(&mut world);
    runner.run_one(&mut world);

    let advertisement = order(&world, first).advertisement().expect("advertisement");
    assert!((advertisement.fitness - 0.1429).abs() < 1e-9);
    assert_eq!(advertisement.capacity, 10);
    assert_eq!(vehicle(&world, truck).objective, Some(6.0));
}

#[test]
fn order_that_does_not_fit_is_deferred_and_vehicle_departs() {
    let mut world = TestWorldBuilder::new().build();
    let truck = spawn_vehicle(&mut world, 1, 10, KLAGENFURT);
    let first = spawn_order(&mut world, 1, KLAGENFURT, GRAZ, 9);
    let second = spawn_order(&mut world, 2, KLAGENFURT, GRAZ, 3);

    let mut runner = ScheduleRunner::new();
    runner.start(&mut world);
    runner.run_one(&mut world);

    assert!(order(&world, first).placed);
    assert!(!order(&world, second).placed);
    assert_eq!(order(&world, second).timer, 9);

    let telemetry = world.resource::<FreightTelemetry>();
    assert_eq!(telemetry.deferral_count(DeferralReason::NoCapacity), 1);
    assert_eq!(telemetry.dispatches.len(), 1);
    assert_eq!(telemetry.dispatches[0].order_ids, vec![1]);
    assert_eq!(telemetry.dispatches[0].destination_region, GRAZ);
    assert!(vehicle(&world, truck).dispatched);
}

#[test]
fn overflow_goes_to_an_empty_vehicle_as_last_resort() {
    let mut world = TestWorldBuilder::new().with_seed(11).build();
    let truck_a = spawn_vehicle(&mut world, 1, 10, KLAGENFURT);
    let truck_b = spawn_vehicle(&mut world, 2, 10, KLAGENFURT);
    let first = spawn_order(&mut world, 1, KLAGENFURT, GRAZ, 9);
    let second = spawn_order(&mut world, 2, KLAGENFURT, GRAZ, 3);

    let mut runner = ScheduleRunner::new();
    runner.start(&mut world);
    runner.run_one(&mut world);

    let first_vehicle = order(&world, first).vehicle.expect("first placed");
    let second_vehicle = order(&world, second).vehicle.expect("second placed");
    assert_ne!(first_vehicle, second_vehicle);
    assert!([truck_a, truck_b].contains(&first_vehicle));
    assert!([truck_a, truck_b].contains(&second_vehicle));
    assert!(order(&world, first).is_advertiser());
    assert!(!order(&world, second).is_advertiser());
    assert_eq!(vehicle(&world, second_vehicle).fitness, None);

    let telemetry = world.resource::<FreightTelemetry>();
    assert_eq!(
        placement_phases(telemetry),
        vec![MatchPhase::Scout, MatchPhase::LastResort]
    );
}

#[test]
fn scout_placement_promotes_on_a_last_resort_vehicle() {
    let mut world = TestWorldBuilder::new().with_seed(11).build();
    spawn_vehicle(&mut world, 1, 10, KLAGENFURT);
    spawn_vehicle(&mut world, 2, 10, KLAGENFURT);
    spawn_order(&mut world, 1, KLAGENFURT, GRAZ, 9);
    let second = spawn_order(&mut world, 2, KLAGENFURT, GRAZ, 3);
    let third = spawn_order(&mut world, 3, KLAGENFURT, GRAZ, 5);

    let mut runner = ScheduleRunner::new();
    runner.start(&mut world);
    runner.run_one(&mut world);

    let shared = order(&world, second).vehicle.expect("second placed");
    assert_eq!(order(&world, third).vehicle, Some(shared));
    assert!(!order(&world, second).is_advertiser());
    assert!(order(&world, third).is_advertiser());
    // 10 - (3 + 5) = 2 remaining
    assert_eq!(vehicle(&world, shared).objective, Some(2.0));

    let telemetry = world.resource::<FreightTelemetry>();
    assert_eq!(
        placement_phases(telemetry),
        vec![MatchPhase::Scout, MatchPhase::LastResort, MatchPhase::Scout]
    );
}

#[test]
fn vehicle_with_other_destination_is_not_eligible() {
    let mut world = TestWorldBuilder::new().build();
    spawn_vehicle(&mut world, 1, 10, KLAGENFURT);
    let first = spawn_order(&mut world, 1, KLAGENFURT, GRAZ, 2);
    let other = spawn_order(&mut world, 2, KLAGENFURT, WIEN, 2);

    let mut runner = ScheduleRunner::new();
    runner.start(&mut world);
    runner.run_one(&mut world);

    assert!(order(&world, first).placed);
    assert!(!order(&world, other).placed);
    let telemetry = world.resource::<FreightTelemetry>();
    assert_eq!(telemetry.deferral_count(DeferralReason::NoEligibleVehicle), 1);
}

#[test]
fn missing_vehicle_triggers_a_single_fleet_request() {
    let mut world = TestWorldBuilder::new().build();
    let truck = spawn_vehicle(&mut world, 1, 10, GRAZ);
    let waiting = spawn_order(&mut world, 1, KLAGENFURT, GRAZ, 4);

    let mut runner = ScheduleRunner::new();
    runner.start(&mut world);
    runner.run_through_tick(&mut world, 22);

    assert!(order(&world, waiting).requesting);
    assert!(!order(&world, waiting).placed);
    assert!(vehicle(&world, truck).requested);
    assert!(vehicle(&world, truck).dispatched);
    {
        let telemetry = world.resource::<FreightTelemetry>();
        assert_eq!(telemetry.fleet_requests, 1);
        assert_eq!(telemetry.deferral_count(DeferralReason::NoVehiclePresent), 23);
        assert_eq!(telemetry.dispatches.len(), 1);
        assert!(telemetry.dispatches[0].is_reposition());
    }

    runner.run_through_tick(&mut world, 23);

    assert!(order(&world, waiting).placed);
    assert!(!order(&world, waiting).requesting);
    assert_eq!(order(&world, waiting).vehicle, Some(truck));
    assert!(!vehicle(&world, truck).requested);
    assert_eq!(vehicle(&world, truck).current_region, KLAGENFURT);
    let telemetry = world.resource::<FreightTelemetry>();
    assert_eq!(placement_phases(telemetry), vec![MatchPhase::Scout]);
    assert_eq!(telemetry.placements[0].tick, 23);
}

#[test]
fn zero_fitness_pool_falls_through_to_scout() {
    let weights = ObjectiveWeights {
        load: 0.0,
        position: 0.0,
        availability: 0.0,
    };
    let mut world = TestWorldBuilder::new().with_weights(weights).build();
    let truck = spawn_vehicle(&mut world, 1, 10, KLAGENFURT);
    let first = spawn_order(&mut world, 1, KLAGENFURT, GRAZ, 4);
    let second = spawn_order(&mut world, 2, KLAGENFURT, GRAZ, 5);

    let mut runner = ScheduleRunner::new();
    runner.start(&mut world);
    runner.run_one(&mut world);

    assert_eq!(order(&world, second).vehicle, Some(truck));
    let advertisement = order(&world, first).advertisement().expect("advertisement");
    assert_eq!(advertisement.fitness, 0.0);
    let telemetry = world.resource::<FreightTelemetry>();
    assert_eq!(
        placement_phases(telemetry),
        vec![MatchPhase::Scout, MatchPhase::Scout]
    );
}

#[test]
fn position_weight_scores_distance_from_home_region() {
    let weights = ObjectiveWeights {
        load: 1.0,
        position: 1.0,
        availability: 0.0,
    };
    let mut world = TestWorldBuilder::new().with_weights(weights).build();
    let truck = spawn_vehicle(&mut world, 1, 10, KLAGENFURT);
    world
        .get_mut::<freight_core::ecs::Vehicle>(truck)
        .expect("vehicle")
        .current_region = GRAZ;
    let only = spawn_order(&mut world, 1, GRAZ, WIEN, 4);

    let mut runner = ScheduleRunner::new();
    runner.start(&mut world);
    runner.run_one(&mut world);

    assert_eq!(order(&world, only).vehicle, Some(truck));
    // remaining 6 plus one region away from home
    assert_eq!(vehicle(&world, truck).objective, Some(7.0));
    let advertisement = order(&world, only).advertisement().expect("advertisement");
    assert_eq!(advertisement.fitness, 0.125);
}
