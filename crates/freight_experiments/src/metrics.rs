//! Metrics extraction from simulation results.
//!
//! Load-per-drive analysis of the dispatch log plus completion and placement
//! statistics for a finished run.

use std::collections::HashMap;

use bevy_ecs::prelude::World;
use freight_core::clock::SimulationClock;
use freight_core::ecs::{Order, Vehicle};
use freight_core::matching::MatchPhase;
use freight_core::telemetry::{DispatchRecord, FreightTelemetry};
use serde::Serialize;

/// Load statistics over the loaded drives of a run.
///
/// A drive is one dispatch. Drives whose origin equals their destination are
/// ignored. Repositioning drives carry nothing and are counted separately.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadStatistics {
    pub loaded_drives: usize,
    pub reposition_drives: usize,
    /// Volume of every loaded drive, in dispatch order.
    pub load_per_drive: Vec<u32>,
    pub avg_unused_capacity_per_drive: f64,
    pub max_load: u32,
    /// Mean of each drive's load relative to `max_load`, in percent.
    pub avg_load_pct_of_max: f64,
    /// Mean of each drive's load relative to its vehicle's capacity, in percent.
    pub avg_load_pct_of_capacity: f64,
}

impl LoadStatistics {
    /// `capacities` maps vehicle id to capacity; unknown vehicles count as
    /// exactly full.
    pub fn from_dispatches(dispatches: &[DispatchRecord], capacities: &HashMap<u32, u32>) -> Self {
        let mut stats = LoadStatistics::default();
        let mut unused = Vec::new();
        let mut pct_of_capacity = Vec::new();

        for dispatch in dispatches {
            if dispatch.origin_region == dispatch.destination_region {
                continue;
            }
            if dispatch.is_reposition() {
                stats.reposition_drives += 1;
                continue;
            }
            let load = dispatch.total_volume;
            let capacity = capacities
                .get(&dispatch.vehicle_id)
                .copied()
                .unwrap_or(load)
                .max(1);
            stats.load_per_drive.push(load);
            unused.push(f64::from(capacity.saturating_sub(load)));
            pct_of_capacity.push(f64::from(load) / f64::from(capacity) * 100.0);
        }

        stats.loaded_drives = stats.load_per_drive.len();
        stats.max_load = stats.load_per_drive.iter().copied().max().unwrap_or(0);
        stats.avg_unused_capacity_per_drive = mean(&unused);
        stats.avg_load_pct_of_capacity = mean(&pct_of_capacity);
        if stats.max_load > 0 {
            let pct_of_max: Vec<f64> = stats
                .load_per_drive
                .iter()
                .map(|&load| f64::from(load) / f64::from(stats.max_load) * 100.0)
                .collect();
            stats.avg_load_pct_of_max = mean(&pct_of_max);
        }
        stats
    }
}

/// Aggregated metrics from a single simulation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SimulationResult {
    pub total_orders: usize,
    pub total_vehicles: usize,
    pub delivered_orders: usize,
    /// Every order was delivered before the run stopped.
    pub terminated: bool,
    /// Termination tick, or the last processed tick if the run was cut short.
    pub ticks: u64,
    pub loaded_drives: usize,
    pub reposition_drives: usize,
    pub avg_load_per_drive: f64,
    pub avg_unused_capacity_per_drive: f64,
    pub max_load: u32,
    pub avg_load_pct_of_max: f64,
    pub avg_load_pct_of_capacity: f64,
    pub avg_delivery_tick: f64,
    pub max_delivery_tick: u64,
    pub onlooker_placements: usize,
    pub scout_placements: usize,
    pub last_resort_placements: usize,
    pub fleet_requests: usize,
    pub deferrals: usize,
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Vehicle id -> capacity for every vehicle in the world.
pub fn vehicle_capacities(world: &mut World) -> HashMap<u32, u32> {
    world
        .query::<&Vehicle>()
        .iter(world)
        .map(|vehicle| (vehicle.id, vehicle.capacity))
        .collect()
}

/// Extract metrics from a completed simulation world.
pub fn extract_metrics(world: &mut World) -> Result<SimulationResult, String> {
    let capacities = vehicle_capacities(world);
    let total_orders = world.query::<&Order>().iter(world).count();
    let now = world
        .get_resource::<SimulationClock>()
        .map(|clock| clock.now())
        .unwrap_or(0);
    let telemetry = world
        .get_resource::<FreightTelemetry>()
        .ok_or_else(|| "FreightTelemetry resource not found".to_string())?;

    let load = LoadStatistics::from_dispatches(&telemetry.dispatches, &capacities);
    let delivery_ticks: Vec<f64> = telemetry
        .deliveries
        .iter()
        .map(|delivery| delivery.tick as f64)
        .collect();
    let loaded_volume: Vec<f64> = load.load_per_drive.iter().map(|&v| f64::from(v)).collect();

    Ok(SimulationResult {
        total_orders,
        total_vehicles: capacities.len(),
        delivered_orders: telemetry.deliveries.len(),
        terminated: telemetry.is_terminated(),
        ticks: telemetry.termination.map(|t| t.tick).unwrap_or(now),
        loaded_drives: load.loaded_drives,
        reposition_drives: load.reposition_drives,
        avg_load_per_drive: mean(&loaded_volume),
        avg_unused_capacity_per_drive: load.avg_unused_capacity_per_drive,
        max_load: load.max_load,
        avg_load_pct_of_max: load.avg_load_pct_of_max,
        avg_load_pct_of_capacity: load.avg_load_pct_of_capacity,
        avg_delivery_tick: mean(&delivery_ticks),
        max_delivery_tick: telemetry
            .deliveries
            .iter()
            .map(|delivery| delivery.tick)
            .max()
            .unwrap_or(0),
        onlooker_placements: telemetry.placements_in_phase(MatchPhase::Onlooker),
        scout_placements: telemetry.placements_in_phase(MatchPhase::Scout),
        last_resort_placements: telemetry.placements_in_phase(MatchPhase::LastResort),
        fleet_requests: telemetry.fleet_requests,
        deferrals: telemetry.deferrals.values().sum(),
    })
}
