//! Candidate selection for the onlooker and scout phases.
//!
//! These functions only decide; the order matching system applies the decision
//! to the world.

use bevy_ecs::prelude::Entity;
use rand::Rng;

use super::scoring::selection_probability;

/// A vehicle as seen through its advertiser order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdvertisedVehicle {
    pub advertiser: Entity,
    pub vehicle: Entity,
    pub vehicle_id: u32,
    pub fitness: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OnlookerDecision {
    /// Commit to the best advertised vehicle.
    Follow {
        choice: AdvertisedVehicle,
        probability: f64,
    },
    /// The draw rejected the best advertisement; search instead.
    Explore { probability: f64 },
    /// Empty pool, or every candidate has zero fitness.
    NoCandidate,
}

/// Highest advertised fitness; ties go to the lowest vehicle id.
pub fn best_advertised(pool: &[AdvertisedVehicle]) -> Option<AdvertisedVehicle> {
    pool.iter().copied().reduce(|best, candidate| {
        let better = candidate.fitness > best.fitness
            || (candidate.fitness == best.fitness && candidate.vehicle_id < best.vehicle_id);
        if better {
            candidate
        } else {
            best
        }
    })
}

pub fn onlooker_decision<R: Rng + ?Sized>(
    pool: &[AdvertisedVehicle],
    rng: &mut R,
) -> OnlookerDecision {
    let Some(best) = best_advertised(pool) else {
        return OnlookerDecision::NoCandidate;
    };
    let total: f64 = pool.iter().map(|candidate| candidate.fitness).sum();
    let Some(probability) = selection_probability(best.fitness, total) else {
        return OnlookerDecision::NoCandidate;
    };

    let draw: f64 = rng.gen();
    if probability > draw {
        OnlookerDecision::Follow {
            choice: best,
            probability,
        }
    } else {
        OnlookerDecision::Explore { probability }
    }
}

/// Random trial-and-error search over a shrinking working pool.
///
/// Picks a uniformly random candidate and hands it to `try_assign`. A rejected
/// candidate is dropped from the pool and the search retries until the pool is
/// exhausted.
pub fn scout_search<R, F>(mut pool: Vec<Entity>, rng: &mut R, mut try_assign: F) -> Option<Entity>
where
    R: Rng + ?Sized,
    F: FnMut(Entity) -> bool,
{
    while !pool.is_empty() {
        let idx = rng.gen_range(0..pool.len());
        let candidate = pool[idx];
        if try_assign(candidate) {
            return Some(candidate);
        }
        pool.swap_remove(idx);
    }
    None
}
