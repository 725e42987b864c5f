//! Run a generated 10 vehicles / 60 orders scenario and print the dispatch log.
//!
//! Run with: cargo run -p freight_core --example scenario_run

use bevy_ecs::prelude::World;
use freight_core::matching::{DeferralReason, MatchPhase};
use freight_core::runner::{initialize_simulation, run_until_empty, simulation_schedule};
use freight_core::scenario::{build_scenario, ScenarioParams};
use freight_core::telemetry::FreightTelemetry;
use freight_core::telemetry_export::join_order_ids;

fn main() {
    const NUM_VEHICLES: usize = 10;
    const NUM_ORDERS: usize = 60;
    const SEED: u64 = 123;

    let mut world = World::new();
    build_scenario(
        &mut world,
        ScenarioParams::default()
            .with_seed(SEED)
            .with_fleet(NUM_VEHICLES, NUM_ORDERS)
            .with_tick_limit(50_000),
    );
    initialize_simulation(&mut world);

    let mut schedule = simulation_schedule();
    let steps = run_until_empty(&mut world, &mut schedule, 2_000_000);

    let telemetry = world.resource::<FreightTelemetry>();
    println!("--- Scenario run ({NUM_VEHICLES} vehicles, {NUM_ORDERS} orders, seed {SEED}) ---");
    println!("Steps executed: {steps}");
    match telemetry.termination {
        Some(termination) => println!(
            "Terminated at tick {} with {} orders delivered",
            termination.tick, termination.delivered_orders
        ),
        None => println!("Stopped before every order was delivered"),
    }
    println!(
        "Placements: onlooker={} scout={} last_resort={}",
        telemetry.placements_in_phase(MatchPhase::Onlooker),
        telemetry.placements_in_phase(MatchPhase::Scout),
        telemetry.placements_in_phase(MatchPhase::LastResort),
    );
    println!(
        "Deferrals: no_vehicle={} no_eligible={} no_capacity={}  fleet requests={}",
        telemetry.deferral_count(DeferralReason::NoVehiclePresent),
        telemetry.deferral_count(DeferralReason::NoEligibleVehicle),
        telemetry.deferral_count(DeferralReason::NoCapacity),
        telemetry.fleet_requests,
    );

    println!("\nDispatches:");
    for dispatch in &telemetry.dispatches {
        let orders = if dispatch.is_reposition() {
            "(empty)".to_string()
        } else {
            join_order_ids(&dispatch.order_ids)
        };
        println!(
            "  tick {:>5}  vehicle {:>3}  {} -> {}  volume {:>2}  orders {}",
            dispatch.tick,
            dispatch.vehicle_id,
            dispatch.origin_region,
            dispatch.destination_region,
            dispatch.total_volume,
            orders,
        );
    }
}
