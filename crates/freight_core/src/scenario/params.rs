use std::fmt;
use std::str::FromStr;

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::matching::ObjectiveWeights;

/// Initial countdown (ticks) carried by every order.
pub const DEFAULT_ORDER_COUNTDOWN: u32 = 10;

/// Capacity of every generated vehicle; the reference fleets all use 32.
pub const DEFAULT_VEHICLE_CAPACITY: u32 = 32;

/// Objective weights used when scoring advertised vehicles.
#[derive(Debug, Clone, Copy, Default, Resource)]
pub struct MatchingConfig {
    pub weights: ObjectiveWeights,
}

/// Order in which unplaced orders are visited during a tick.
///
/// The outcome of contested capacity depends on it, so it is explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationOrder {
    /// Ascending order id.
    #[default]
    CreationOrder,
    /// A fresh permutation every tick, drawn from the matching RNG.
    Shuffled,
}

impl fmt::Display for ActivationOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivationOrder::CreationOrder => write!(f, "creation_order"),
            ActivationOrder::Shuffled => write!(f, "shuffled"),
        }
    }
}

impl FromStr for ActivationOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "creation_order" | "creation" => Ok(ActivationOrder::CreationOrder),
            "shuffled" => Ok(ActivationOrder::Shuffled),
            other => Err(format!("unknown activation order: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Resource)]
pub struct ActivationPolicy {
    pub order: ActivationOrder,
}

#[derive(Debug, Clone, Copy, Resource)]
pub struct OrderCountdown(pub u32);

impl Default for OrderCountdown {
    fn default() -> Self {
        Self(DEFAULT_ORDER_COUNTDOWN)
    }
}

/// When set, the runner stops once the next event is at or past this tick.
#[derive(Debug, Clone, Copy, Resource)]
pub struct TickLimit(pub u64);

/// Parameters for building a simulation scenario.
#[derive(Debug, Clone)]
pub struct ScenarioParams {
    pub num_vehicles: usize,
    pub num_orders: usize,
    pub num_freighters: u32,
    pub vehicle_capacity: u32,
    /// Largest generated order volume; clamped to the vehicle capacity.
    pub max_order_volume: u32,
    pub seed: Option<u64>,
    pub activation: ActivationOrder,
    pub order_countdown: u32,
    pub weights: ObjectiveWeights,
    /// Optional hard stop for runs that cannot complete.
    pub tick_limit: Option<u64>,
    /// Travel speed override. If None, the topology default is used.
    pub speed_per_tick: Option<f64>,
    /// Ticks between telemetry snapshots. If None, defaults to every tick.
    pub snapshot_interval_ticks: Option<u64>,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            num_vehicles: 10,
            num_orders: 60,
            num_freighters: 3,
            vehicle_capacity: DEFAULT_VEHICLE_CAPACITY,
            max_order_volume: 12,
            seed: None,
            activation: ActivationOrder::default(),
            order_countdown: DEFAULT_ORDER_COUNTDOWN,
            weights: ObjectiveWeights::default(),
            tick_limit: None,
            speed_per_tick: None,
            snapshot_interval_ticks: None,
        }
    }
}

impl ScenarioParams {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_fleet(mut self, num_vehicles: usize, num_orders: usize) -> Self {
        self.num_vehicles = num_vehicles;
        self.num_orders = num_orders;
        self
    }

    pub fn with_activation(mut self, activation: ActivationOrder) -> Self {
        self.activation = activation;
        self
    }

    pub fn with_order_countdown(mut self, ticks: u32) -> Self {
        self.order_countdown = ticks;
        self
    }

    pub fn with_weights(mut self, weights: ObjectiveWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_tick_limit(mut self, ticks: u64) -> Self {
        self.tick_limit = Some(ticks);
        self
    }

    pub fn with_speed_per_tick(mut self, speed: f64) -> Self {
        self.speed_per_tick = Some(speed);
        self
    }

    pub fn with_snapshot_interval(mut self, ticks: u64) -> Self {
        self.snapshot_interval_ticks = Some(ticks);
        self
    }
}
