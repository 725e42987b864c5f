pub mod bee_colony;
pub mod scoring;
pub mod types;

use bevy_ecs::prelude::Resource;
use rand::rngs::StdRng;
use rand::SeedableRng;

pub use bee_colony::{
    best_advertised, onlooker_decision, scout_search, AdvertisedVehicle, OnlookerDecision,
};
pub use scoring::{fitness, objective, selection_probability, ObjectiveWeights};
pub use types::{DeferralReason, MatchOutcome, MatchPhase};

/// Seeded randomness shared by candidate selection, probability draws, fleet
/// requests and shuffled activation.
#[derive(Debug, Resource)]
pub struct MatchingRng(pub StdRng);

impl MatchingRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl Default for MatchingRng {
    fn default() -> Self {
        Self::seeded(0)
    }
}
