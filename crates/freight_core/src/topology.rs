//! Regional topology: a small fixed set of named regions.
//!
//! Only region identity matters to matching. Coordinates exist so the runner can
//! turn a dispatch into a travel duration (in ticks) between two regions.

use std::collections::BTreeMap;

use bevy_ecs::prelude::{Entity, Resource};
use serde::{Deserialize, Serialize};

use crate::ecs::RegionId;

/// Distance units covered by a traveling vehicle per tick.
pub const DEFAULT_SPEED_PER_TICK: f64 = 0.6;

/// A vehicle within this distance of its target counts as arrived.
pub const ARRIVAL_RADIUS: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSpec {
    pub id: RegionId,
    pub name: String,
    pub x: f64,
    pub y: f64,
}

impl RegionSpec {
    pub fn new(id: u32, name: &str, x: f64, y: f64) -> Self {
        Self {
            id: RegionId(id),
            name: name.to_string(),
            x,
            y,
        }
    }
}

#[derive(Debug, Clone, Resource)]
pub struct Topology {
    regions: Vec<RegionSpec>,
    speed_per_tick: f64,
}

impl Default for Topology {
    fn default() -> Self {
        Self::new(default_regions())
    }
}

/// Four Austrian regions used by the reference problem instances.
pub fn default_regions() -> Vec<RegionSpec> {
    vec![
        RegionSpec::new(1, "klagenfurt", 17.0, 5.0),
        RegionSpec::new(2, "graz", 29.0, 13.0),
        RegionSpec::new(3, "wien", 39.0, 34.0),
        RegionSpec::new(4, "salzburg", 3.0, 26.0),
    ]
}

impl Topology {
    pub fn new(mut regions: Vec<RegionSpec>) -> Self {
        regions.sort_by_key(|region| region.id);
        Self {
            regions,
            speed_per_tick: DEFAULT_SPEED_PER_TICK,
        }
    }

    pub fn with_speed_per_tick(mut self, speed: f64) -> Self {
        self.speed_per_tick = speed.max(f64::EPSILON);
        self
    }

    pub fn regions(&self) -> &[RegionSpec] {
        &self.regions
    }

    pub fn region_ids(&self) -> impl Iterator<Item = RegionId> + '_ {
        self.regions.iter().map(|region| region.id)
    }

    pub fn contains(&self, id: RegionId) -> bool {
        self.region(id).is_some()
    }

    pub fn region(&self, id: RegionId) -> Option<&RegionSpec> {
        self.regions
            .binary_search_by_key(&id, |region| region.id)
            .ok()
            .map(|idx| &self.regions[idx])
    }

    pub fn name(&self, id: RegionId) -> Option<&str> {
        self.region(id).map(|region| region.name.as_str())
    }

    pub fn distance(&self, from: RegionId, to: RegionId) -> Option<f64> {
        let a = self.region(from)?;
        let b = self.region(to)?;
        Some(((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt())
    }

    /// Ticks a vehicle needs to travel between two regions. Always at least one,
    /// so a dispatch never arrives within the tick it departs.
    pub fn travel_ticks(&self, from: RegionId, to: RegionId) -> u64 {
        let distance = self.distance(from, to).unwrap_or(0.0);
        let remaining = (distance - ARRIVAL_RADIUS).max(0.0);
        ((remaining / self.speed_per_tick).ceil() as u64).max(1)
    }
}

/// Region -> vehicles occupying it, rebuilt at the start of every tick pass.
///
/// Vehicles are listed by ascending vehicle id. Occupancy can change during the
/// pass (fleet requests), so callers still check [`crate::ecs::Vehicle::occupies`].
#[derive(Debug, Default, Resource)]
pub struct RegionIndex {
    vehicles_by_region: BTreeMap<RegionId, Vec<Entity>>,
}

impl RegionIndex {
    pub fn clear(&mut self) {
        self.vehicles_by_region.clear();
    }

    pub fn insert(&mut self, region: RegionId, vehicle: Entity) {
        self.vehicles_by_region.entry(region).or_default().push(vehicle);
    }

    pub fn vehicles_at(&self, region: RegionId) -> &[Entity] {
        self.vehicles_by_region
            .get(&region)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn occupied_regions(&self) -> impl Iterator<Item = RegionId> + '_ {
        self.vehicles_by_region
            .iter()
            .filter(|(_, vehicles)| !vehicles.is_empty())
            .map(|(region, _)| *region)
    }
}
