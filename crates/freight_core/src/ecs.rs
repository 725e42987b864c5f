use std::fmt;

use bevy_ecs::prelude::{Component, Entity};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identity of a discrete region. Also used as the region index in the objective's
/// position term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(pub u32);

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable manifest line for an order sitting in a vehicle's load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cargo {
    pub order: Entity,
    pub order_id: u32,
    pub origin: RegionId,
    pub destination: RegionId,
    pub volume: u32,
}

/// Snapshot of a vehicle published by its advertiser order.
///
/// Taken when the order is promoted and then appended to on every later
/// assignment. It is a copy, not a view of the vehicle.
#[derive(Debug, Clone, PartialEq)]
pub struct Advertisement {
    pub fitness: f64,
    pub capacity: u32,
    pub load: Vec<Cargo>,
}

impl Advertisement {
    pub fn advertised_volume(&self) -> u32 {
        self.load.iter().map(|cargo| cargo.volume).sum()
    }

    pub fn spare_capacity(&self) -> u32 {
        self.capacity.saturating_sub(self.advertised_volume())
    }

    pub fn has_space_for(&self, volume: u32) -> bool {
        self.spare_capacity() >= volume
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum OrderRole {
    #[default]
    None,
    Advertiser(Advertisement),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AssignmentError {
    #[error("order {order_id} is already placed")]
    AlreadyPlaced { order_id: u32 },
    #[error("vehicle {vehicle_id} cannot take {volume} units (capacity {capacity}, loaded {loaded})")]
    CapacityExceeded {
        vehicle_id: u32,
        capacity: u32,
        loaded: u32,
        volume: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Component)]
pub struct Order {
    pub id: u32,
    pub origin: RegionId,
    pub destination: RegionId,
    pub volume: u32,
    /// Countdown in ticks; decremented while unplaced, zero means due.
    pub timer: u32,
    pub placed: bool,
    pub delivered: bool,
    /// A fleet request for this order is outstanding.
    pub requesting: bool,
    /// Set once on placement, never reassigned.
    pub vehicle: Option<Entity>,
    pub role: OrderRole,
}

impl Order {
    pub fn new(id: u32, origin: RegionId, destination: RegionId, volume: u32, countdown: u32) -> Self {
        Self {
            id,
            origin,
            destination,
            volume,
            timer: countdown,
            placed: false,
            delivered: false,
            requesting: false,
            vehicle: None,
            role: OrderRole::None,
        }
    }

    pub fn is_due(&self) -> bool {
        self.timer == 0
    }

    pub fn tick_countdown(&mut self) {
        self.timer = self.timer.saturating_sub(1);
    }

    pub fn place(&mut self, vehicle: Entity) -> Result<(), AssignmentError> {
        if self.placed || self.vehicle.is_some() {
            return Err(AssignmentError::AlreadyPlaced { order_id: self.id });
        }
        self.placed = true;
        self.vehicle = Some(vehicle);
        self.requesting = false;
        Ok(())
    }

    pub fn cargo(&self, entity: Entity) -> Cargo {
        Cargo {
            order: entity,
            order_id: self.id,
            origin: self.origin,
            destination: self.destination,
            volume: self.volume,
        }
    }

    pub fn is_advertiser(&self) -> bool {
        matches!(self.role, OrderRole::Advertiser(_))
    }

    pub fn advertisement(&self) -> Option<&Advertisement> {
        match &self.role {
            OrderRole::Advertiser(ad) => Some(ad),
            OrderRole::None => None,
        }
    }

    pub fn advertisement_mut(&mut self) -> Option<&mut Advertisement> {
        match &mut self.role {
            OrderRole::Advertiser(ad) => Some(ad),
            OrderRole::None => None,
        }
    }

    pub fn mark_delivered(&mut self) {
        self.delivered = true;
        self.role = OrderRole::None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VehicleState {
    Collecting,
    TravelingLoaded,
    TravelingEmpty,
}

#[derive(Debug, Clone, PartialEq, Component)]
pub struct Vehicle {
    pub id: u32,
    pub freighter_id: u32,
    pub capacity: u32,
    /// Region the vehicle started in; fixed for the whole run.
    pub home_region: RegionId,
    pub current_region: RegionId,
    /// `None` while collecting with no outstanding request.
    pub target_region: Option<RegionId>,
    pub load: Vec<Cargo>,
    pub dispatched: bool,
    /// Committed to an empty repositioning trip for a fleet request.
    pub requested: bool,
    pub requested_by: Option<Entity>,
    pub objective: Option<f64>,
    pub fitness: Option<f64>,
}

impl Vehicle {
    pub fn new(id: u32, freighter_id: u32, capacity: u32, start_region: RegionId) -> Self {
        Self {
            id,
            freighter_id,
            capacity,
            home_region: start_region,
            current_region: start_region,
            target_region: None,
            load: Vec::new(),
            dispatched: false,
            requested: false,
            requested_by: None,
            objective: None,
            fitness: None,
        }
    }

    pub fn loaded_volume(&self) -> u32 {
        self.load.iter().map(|cargo| cargo.volume).sum()
    }

    pub fn remaining_capacity(&self) -> u32 {
        self.capacity.saturating_sub(self.loaded_volume())
    }

    pub fn fits(&self, volume: u32) -> bool {
        volume <= self.remaining_capacity()
    }

    /// Physically present at `region` and free to take orders.
    pub fn occupies(&self, region: RegionId) -> bool {
        self.current_region == region && !self.dispatched && !self.requested
    }

    pub fn carries_destination(&self, destination: RegionId) -> bool {
        self.load.iter().any(|cargo| cargo.destination == destination)
    }

    pub fn load_destination(&self) -> Option<RegionId> {
        self.load.first().map(|cargo| cargo.destination)
    }

    pub fn try_load(&mut self, cargo: Cargo) -> Result<(), AssignmentError> {
        if !self.fits(cargo.volume) {
            return Err(AssignmentError::CapacityExceeded {
                vehicle_id: self.id,
                capacity: self.capacity,
                loaded: self.loaded_volume(),
                volume: cargo.volume,
            });
        }
        self.load.push(cargo);
        Ok(())
    }

    pub fn state(&self) -> VehicleState {
        match (self.dispatched || self.requested, self.load.is_empty()) {
            (false, _) => VehicleState::Collecting,
            (true, false) => VehicleState::TravelingLoaded,
            (true, true) => VehicleState::TravelingEmpty,
        }
    }
}
