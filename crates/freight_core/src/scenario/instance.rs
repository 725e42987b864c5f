//! Problem instance input: vehicles and orders, validated before any tick runs.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ecs::RegionId;
use crate::topology::{RegionSpec, Topology};

#[derive(Debug, Error)]
pub enum InstanceError {
    #[error("failed to read instance {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed instance: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate region id {0}")]
    DuplicateRegion(u32),
    #[error("duplicate vehicle id {0}")]
    DuplicateVehicle(u32),
    #[error("duplicate order id {0}")]
    DuplicateOrder(u32),
    #[error("vehicle {id} has non-positive capacity {capacity}")]
    NonPositiveCapacity { id: u32, capacity: i64 },
    #[error("vehicle {id} capacity {capacity} is out of range")]
    CapacityOutOfRange { id: u32, capacity: i64 },
    #[error("order {id} has non-positive volume {volume}")]
    NonPositiveVolume { id: u32, volume: i64 },
    #[error("order {id} volume {volume} exceeds the largest vehicle capacity {max_capacity}")]
    VolumeExceedsCapacity { id: u32, volume: i64, max_capacity: i64 },
    #[error("{kind} {id} references unknown region {region}")]
    UnknownRegion {
        kind: &'static str,
        id: u32,
        region: u32,
    },
    #[error("instance has {orders} orders but no vehicles")]
    NoVehicles { orders: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleRecord {
    #[serde(alias = "truckId")]
    pub id: u32,
    pub capacity: i64,
    #[serde(alias = "position")]
    pub start_region: u32,
    #[serde(alias = "freighter")]
    pub freighter_id: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    #[serde(alias = "orderId")]
    pub id: u32,
    pub origin: u32,
    pub destination: u32,
    pub volume: i64,
}

/// Raw instance as read from JSON. Accepts both the snake_case field names and
/// the camelCase names of the reference data sets (`trucks`, `truckId`, ...).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Instance {
    /// Optional region list; the default four-region topology is used when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub regions: Vec<RegionSpec>,
    #[serde(alias = "trucks")]
    pub vehicles: Vec<VehicleRecord>,
    pub orders: Vec<OrderRecord>,
}

impl Instance {
    pub fn from_json_str(json: &str) -> Result<Self, InstanceError> {
        let instance: Instance = serde_json::from_str(json)?;
        instance.validate()?;
        Ok(instance)
    }

    pub fn topology(&self) -> Topology {
        if self.regions.is_empty() {
            Topology::default()
        } else {
            Topology::new(self.regions.clone())
        }
    }

    pub fn max_capacity(&self) -> i64 {
        self.vehicles
            .iter()
            .map(|vehicle| vehicle.capacity)
            .max()
            .unwrap_or(0)
    }

    /// Rejects anything the simulation cannot run. Called before any entity is spawned.
    pub fn validate(&self) -> Result<(), InstanceError> {
        let mut region_ids = HashSet::new();
        for region in &self.regions {
            if !region_ids.insert(region.id) {
                return Err(InstanceError::DuplicateRegion(region.id.0));
            }
        }
        let topology = self.topology();

        if self.vehicles.is_empty() && !self.orders.is_empty() {
            return Err(InstanceError::NoVehicles {
                orders: self.orders.len(),
            });
        }

        let mut vehicle_ids = HashSet::new();
        for vehicle in &self.vehicles {
            if !vehicle_ids.insert(vehicle.id) {
                return Err(InstanceError::DuplicateVehicle(vehicle.id));
            }
            if vehicle.capacity <= 0 {
                return Err(InstanceError::NonPositiveCapacity {
                    id: vehicle.id,
                    capacity: vehicle.capacity,
                });
            }
            if u32::try_from(vehicle.capacity).is_err() {
                return Err(InstanceError::CapacityOutOfRange {
                    id: vehicle.id,
                    capacity: vehicle.capacity,
                });
            }
            if !topology.contains(RegionId(vehicle.start_region)) {
                return Err(InstanceError::UnknownRegion {
                    kind: "vehicle",
                    id: vehicle.id,
                    region: vehicle.start_region,
                });
            }
        }

        let max_capacity = self.max_capacity();
        let mut order_ids = HashSet::new();
        for order in &self.orders {
            if !order_ids.insert(order.id) {
                return Err(InstanceError::DuplicateOrder(order.id));
            }
            if order.volume <= 0 {
                return Err(InstanceError::NonPositiveVolume {
                    id: order.id,
                    volume: order.volume,
                });
            }
            if order.volume > max_capacity {
                return Err(InstanceError::VolumeExceedsCapacity {
                    id: order.id,
                    volume: order.volume,
                    max_capacity,
                });
            }
            for region in [order.origin, order.destination] {
                if !topology.contains(RegionId(region)) {
                    return Err(InstanceError::UnknownRegion {
                        kind: "order",
                        id: order.id,
                        region,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Reads and validates an instance file.
pub fn load_instance(path: impl AsRef<Path>) -> Result<Instance, InstanceError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|source| InstanceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Instance::from_json_str(&json)
}
