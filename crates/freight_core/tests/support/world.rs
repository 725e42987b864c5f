#![allow(dead_code)]

use bevy_ecs::prelude::World;
use freight_core::matching::ObjectiveWeights;
use freight_core::scenario::{ActivationOrder, ActivationPolicy, MatchingConfig, TickLimit};
use freight_core::test_helpers::create_test_world;

/// Builder configuration for reproducible test worlds.
#[derive(Clone, Debug)]
pub struct TestWorldConfig {
    pub seed: u64,
    pub activation: ActivationOrder,
    pub weights: ObjectiveWeights,
    pub tick_limit: Option<u64>,
}

impl Default for TestWorldConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            activation: ActivationOrder::CreationOrder,
            weights: ObjectiveWeights::default(),
            tick_limit: None,
        }
    }
}

/// Helper that populates the ECS world with all shared resources used in integration tests.
#[derive(Debug, Default)]
pub struct TestWorldBuilder {
    config: TestWorldConfig,
}

impl TestWorldBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the seed of the matching RNG.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn with_activation(mut self, activation: ActivationOrder) -> Self {
        self.config.activation = activation;
        self
    }

    /// Replace the objective weights used to score advertised vehicles.
    pub fn with_weights(mut self, weights: ObjectiveWeights) -> Self {
        self.config.weights = weights;
        self
    }

    pub fn with_tick_limit(mut self, ticks: u64) -> Self {
        self.config.tick_limit = Some(ticks);
        self
    }

    /// Build the ECS world with the configured resources.
    pub fn build(self) -> World {
        let TestWorldConfig {
            seed,
            activation,
            weights,
            tick_limit,
        } = self.config;

        let mut world = create_test_world(seed);
        world.insert_resource(ActivationPolicy { order: activation });
        world.insert_resource(MatchingConfig { weights });
        if let Some(limit) = tick_limit {
            world.insert_resource(TickLimit(limit));
        }
        world
    }
}
