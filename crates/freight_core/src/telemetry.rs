//! Telemetry: dispatch, delivery and termination records plus periodic counts.
//!
//! The dispatch, delivery and termination records are the contract with logging
//! and analysis collaborators; everything else here is diagnostic.

use std::collections::{BTreeMap, VecDeque};

use bevy_ecs::prelude::Resource;

use crate::ecs::{Order, RegionId, VehicleState};
use crate::matching::{DeferralReason, MatchPhase};

/// One vehicle departure. Reposition legs carry no orders and zero volume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRecord {
    pub tick: u64,
    pub vehicle_id: u32,
    pub origin_region: RegionId,
    pub destination_region: RegionId,
    pub order_ids: Vec<u32>,
    pub total_volume: u32,
}

impl DispatchRecord {
    pub fn is_reposition(&self) -> bool {
        self.order_ids.is_empty()
    }
}

/// One delivered order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryRecord {
    pub tick: u64,
    pub order_id: u32,
    pub origin: RegionId,
    pub destination: RegionId,
    pub vehicle_id: u32,
    pub volume: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementRecord {
    pub tick: u64,
    pub order_id: u32,
    pub vehicle_id: u32,
    pub phase: MatchPhase,
}

/// Emitted once, on the tick every order is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminationRecord {
    pub tick: u64,
    pub delivered_orders: usize,
}

#[derive(Debug, Default, Resource)]
pub struct FreightTelemetry {
    pub dispatches: Vec<DispatchRecord>,
    pub deliveries: Vec<DeliveryRecord>,
    pub placements: Vec<PlacementRecord>,
    pub deferrals: BTreeMap<DeferralReason, usize>,
    pub fleet_requests: usize,
    pub termination: Option<TerminationRecord>,
}

impl FreightTelemetry {
    pub fn record_deferral(&mut self, reason: DeferralReason) {
        *self.deferrals.entry(reason).or_insert(0) += 1;
    }

    pub fn deferral_count(&self, reason: DeferralReason) -> usize {
        self.deferrals.get(&reason).copied().unwrap_or(0)
    }

    pub fn placements_in_phase(&self, phase: MatchPhase) -> usize {
        self.placements
            .iter()
            .filter(|record| record.phase == phase)
            .count()
    }

    pub fn is_terminated(&self) -> bool {
        self.termination.is_some()
    }
}

/// Aggregated counts at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FleetCounts {
    pub orders_unplaced: usize,
    pub orders_placed: usize,
    pub orders_delivered: usize,
    pub vehicles_collecting: usize,
    pub vehicles_traveling_loaded: usize,
    pub vehicles_traveling_empty: usize,
}

impl FleetCounts {
    pub fn add_order(&mut self, order: &Order) {
        if order.delivered {
            self.orders_delivered += 1;
        } else if order.placed {
            self.orders_placed += 1;
        } else {
            self.orders_unplaced += 1;
        }
    }

    pub fn add_vehicle(&mut self, state: VehicleState) {
        match state {
            VehicleState::Collecting => self.vehicles_collecting += 1,
            VehicleState::TravelingLoaded => self.vehicles_traveling_loaded += 1,
            VehicleState::TravelingEmpty => self.vehicles_traveling_empty += 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TickSnapshot {
    pub tick: u64,
    pub counts: FleetCounts,
}

/// Snapshot capture configuration.
#[derive(Debug, Clone, Copy, Resource)]
pub struct SnapshotConfig {
    pub interval_ticks: u64,
    pub max_snapshots: usize,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            interval_ticks: 1,
            max_snapshots: 10_000,
        }
    }
}

/// Rolling snapshot buffer.
#[derive(Debug, Default, Resource)]
pub struct TickSnapshots {
    pub snapshots: VecDeque<TickSnapshot>,
    pub last_snapshot_at: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_orders_by_lifecycle_stage() {
        let mut counts = FleetCounts::default();
        let mut order = Order::new(1, RegionId(1), RegionId(2), 3, 10);
        counts.add_order(&order);
        order.placed = true;
        counts.add_order(&order);
        order.delivered = true;
        counts.add_order(&order);

        assert_eq!(counts.orders_unplaced, 1);
        assert_eq!(counts.orders_placed, 1);
        assert_eq!(counts.orders_delivered, 1);
    }

    #[test]
    fn deferrals_accumulate_per_reason() {
        let mut telemetry = FreightTelemetry::default();
        telemetry.record_deferral(DeferralReason::NoCapacity);
        telemetry.record_deferral(DeferralReason::NoCapacity);
        telemetry.record_deferral(DeferralReason::NoVehiclePresent);
        assert_eq!(telemetry.deferral_count(DeferralReason::NoCapacity), 2);
        assert_eq!(telemetry.deferral_count(DeferralReason::NoEligibleVehicle), 0);
    }
}
