//! Scenario setup: load or generate an instance and build it into a world.
//!
//! Instances are validated before anything is spawned. Generated scenarios are
//! driven by [ScenarioParams] and fully determined by its seed.

mod build;
mod instance;
mod params;

pub use build::{
    build_scenario, build_scenario_from_instance, generate_instance, random_destination,
};
pub use instance::{load_instance, Instance, InstanceError, OrderRecord, VehicleRecord};
pub use params::{
    ActivationOrder, ActivationPolicy, MatchingConfig, OrderCountdown, ScenarioParams, TickLimit,
    DEFAULT_ORDER_COUNTDOWN, DEFAULT_VEHICLE_CAPACITY,
};
