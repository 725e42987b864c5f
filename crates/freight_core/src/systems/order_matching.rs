//! Order matching system: runs the onlooker/scout procedure once per tick for
//! every unplaced order.
//!
//! Orders only learn about a vehicle through its advertiser order. The scout
//! phase is the exception: it tries a vehicle directly and learns whether the
//! order fits.

use std::collections::HashMap;

use bevy_ecs::prelude::{Entity, Query, Res, ResMut};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, error};

use crate::clock::SimulationClock;
use crate::ecs::{Advertisement, Order, OrderRole, RegionId, Vehicle};
use crate::matching::{
    fitness, objective, onlooker_decision, scout_search, AdvertisedVehicle, DeferralReason,
    MatchOutcome, MatchPhase, MatchingRng, ObjectiveWeights, OnlookerDecision,
};
use crate::scenario::{ActivationOrder, ActivationPolicy, MatchingConfig};
use crate::systems::fleet_request::request_fleet;
use crate::telemetry::{FreightTelemetry, PlacementRecord};
use crate::topology::RegionIndex;

type OrderQuery<'w, 's> = Query<'w, 's, (Entity, &'static mut Order)>;
type VehicleQuery<'w, 's> = Query<'w, 's, (Entity, &'static mut Vehicle)>;

#[allow(clippy::too_many_arguments)]
pub fn order_matching_system(
    clock: Res<SimulationClock>,
    config: Res<MatchingConfig>,
    policy: Res<ActivationPolicy>,
    index: Res<RegionIndex>,
    mut rng: ResMut<MatchingRng>,
    mut telemetry: ResMut<FreightTelemetry>,
    mut orders: OrderQuery,
    mut vehicles: VehicleQuery,
) {
    let mut activation = activation_sequence(&orders);
    if policy.order == ActivationOrder::Shuffled {
        activation.shuffle(&mut rng.0);
    }

    let mut pass = MatchPass {
        tick: clock.now(),
        weights: config.weights,
        index: &*index,
        rng: &mut rng.0,
        telemetry: &mut *telemetry,
        advertisers: advertiser_lookup(&orders),
        orders: &mut orders,
        vehicles: &mut vehicles,
    };

    for order_entity in activation {
        let outcome = pass.match_order(order_entity);
        if let MatchOutcome::Deferred(reason) = outcome {
            pass.telemetry.record_deferral(reason);
            if let Ok((_, mut order)) = pass.orders.get_mut(order_entity) {
                debug!(order_id = order.id, ?reason, timer = order.timer, "order deferred");
                order.tick_countdown();
            }
        }
    }
}

/// Unplaced orders by ascending id.
fn activation_sequence(orders: &OrderQuery) -> Vec<Entity> {
    let mut pending: Vec<(u32, Entity)> = orders
        .iter()
        .filter(|(_, order)| !order.placed)
        .map(|(entity, order)| (order.id, entity))
        .collect();
    pending.sort_unstable_by_key(|(id, _)| *id);
    pending.into_iter().map(|(_, entity)| entity).collect()
}

/// Vehicle -> its advertiser order, for every undelivered advertiser.
fn advertiser_lookup(orders: &OrderQuery) -> HashMap<Entity, Entity> {
    orders
        .iter()
        .filter(|(_, order)| order.is_advertiser() && !order.delivered)
        .filter_map(|(entity, order)| order.vehicle.map(|vehicle| (vehicle, entity)))
        .collect()
}

/// State shared by every order decision within one tick.
///
/// The two queries come from separate system params, so each keeps its own
/// world and state lifetimes.
struct MatchPass<'a, 'wo, 'so, 'wv, 'sv> {
    tick: u64,
    weights: ObjectiveWeights,
    index: &'a RegionIndex,
    rng: &'a mut StdRng,
    telemetry: &'a mut FreightTelemetry,
    advertisers: HashMap<Entity, Entity>,
    orders: &'a mut OrderQuery<'wo, 'so>,
    vehicles: &'a mut VehicleQuery<'wv, 'sv>,
}

impl MatchPass<'_, '_, '_, '_, '_> {
    fn match_order(&mut self, order_entity: Entity) -> MatchOutcome {
        let Ok((_, order)) = self.orders.get(order_entity) else {
            return MatchOutcome::Deferred(DeferralReason::NoVehiclePresent);
        };
        let (origin, destination, volume) = (order.origin, order.destination, order.volume);

        let present = self.vehicles_present(origin);
        if present.is_empty() {
            if let Ok((_, mut order)) = self.orders.get_mut(order_entity) {
                if !order.requesting
                    && request_fleet(
                        order_entity,
                        &mut order,
                        &mut *self.vehicles,
                        &mut *self.rng,
                    )
                    .is_some()
                {
                    self.telemetry.fleet_requests += 1;
                }
            }
            return MatchOutcome::Deferred(DeferralReason::NoVehiclePresent);
        }

        let matching: Vec<Entity> = self.filter_vehicles(&present, |vehicle| {
            vehicle.carries_destination(destination)
        });
        if !matching.is_empty() {
            if let Some(outcome) = self.onlooker_phase(order_entity, &matching, volume) {
                return outcome;
            }
            return self.scout_phase(order_entity, matching, volume, &present, false);
        }

        let empty = self.filter_vehicles(&present, |vehicle| vehicle.load.is_empty());
        if empty.is_empty() {
            // Vehicles present but none usable: left as a quiet deferral.
            return MatchOutcome::Deferred(DeferralReason::NoEligibleVehicle);
        }
        self.scout_phase(order_entity, empty, volume, &present, true)
    }

    /// Vehicles occupying `region`, by ascending vehicle id.
    fn vehicles_present(&self, region: RegionId) -> Vec<Entity> {
        self.filter_vehicles(self.index.vehicles_at(region), |vehicle| {
            vehicle.occupies(region)
        })
    }

    fn filter_vehicles(&self, pool: &[Entity], keep: impl Fn(&Vehicle) -> bool) -> Vec<Entity> {
        pool.iter()
            .copied()
            .filter(|&entity| {
                self.vehicles
                    .get(entity)
                    .is_ok_and(|(_, vehicle)| keep(vehicle))
            })
            .collect()
    }

    /// Returns `None` when the order should fall through to the scout phase.
    fn onlooker_phase(
        &mut self,
        order_entity: Entity,
        matching: &[Entity],
        volume: u32,
    ) -> Option<MatchOutcome> {
        let pool: Vec<AdvertisedVehicle> = matching
            .iter()
            .filter_map(|&vehicle| {
                let advertiser = *self.advertisers.get(&vehicle)?;
                let (_, order) = self.orders.get(advertiser).ok()?;
                let advertisement = order.advertisement()?;
                if !advertisement.has_space_for(volume) {
                    return None;
                }
                let (_, vehicle_state) = self.vehicles.get(vehicle).ok()?;
                Some(AdvertisedVehicle {
                    advertiser,
                    vehicle,
                    vehicle_id: vehicle_state.id,
                    fitness: advertisement.fitness,
                })
            })
            .collect();

        match onlooker_decision(&pool, &mut *self.rng) {
            OnlookerDecision::Follow {
                choice,
                probability,
            } => {
                debug!(
                    vehicle_id = choice.vehicle_id,
                    probability,
                    "onlooker follows advertisement"
                );
                if !self.assign(order_entity, choice.vehicle, MatchPhase::Onlooker) {
                    return None;
                }
                self.refresh_fitness(choice.advertiser, choice.vehicle);
                Some(MatchOutcome::Placed {
                    vehicle: choice.vehicle,
                    phase: MatchPhase::Onlooker,
                })
            }
            OnlookerDecision::Explore { probability } => {
                debug!(probability, "onlooker explores instead");
                None
            }
            OnlookerDecision::NoCandidate => None,
        }
    }

    fn scout_phase(
        &mut self,
        order_entity: Entity,
        seed: Vec<Entity>,
        volume: u32,
        present: &[Entity],
        seeded_with_empty: bool,
    ) -> MatchOutcome {
        let vehicles = &*self.vehicles;
        let chosen = scout_search(seed, &mut *self.rng, |candidate| {
            vehicles
                .get(candidate)
                .is_ok_and(|(_, vehicle)| vehicle.fits(volume))
        });
        if let Some(vehicle) = chosen {
            if self.assign(order_entity, vehicle, MatchPhase::Scout) {
                return MatchOutcome::Placed {
                    vehicle,
                    phase: MatchPhase::Scout,
                };
            }
        }

        if !seeded_with_empty {
            let empty = self.filter_vehicles(present, |vehicle| {
                vehicle.load.is_empty() && vehicle.fits(volume)
            });
            if let Some(&vehicle) = empty.choose(&mut *self.rng) {
                if self.assign(order_entity, vehicle, MatchPhase::LastResort) {
                    return MatchOutcome::Placed {
                        vehicle,
                        phase: MatchPhase::LastResort,
                    };
                }
            }
        }
        MatchOutcome::Deferred(DeferralReason::NoCapacity)
    }

    /// Loads the order onto the vehicle and keeps the vehicle's advertisement in
    /// step. The first order a scout or onlooker places on a vehicle becomes its
    /// advertiser.
    fn assign(&mut self, order_entity: Entity, vehicle_entity: Entity, phase: MatchPhase) -> bool {
        let Ok((_, mut order)) = self.orders.get_mut(order_entity) else {
            return false;
        };
        let Ok((_, mut vehicle)) = self.vehicles.get_mut(vehicle_entity) else {
            return false;
        };

        let cargo = order.cargo(order_entity);
        if let Err(err) = vehicle.try_load(cargo) {
            error!(order_id = order.id, %err, "assignment rejected");
            return false;
        }
        if let Err(err) = order.place(vehicle_entity) {
            error!(vehicle_id = vehicle.id, %err, "assignment rejected");
            vehicle.load.retain(|loaded| loaded.order != order_entity);
            return false;
        }

        match self.advertisers.get(&vehicle_entity).copied() {
            // Last-resort loads never advertise; a later scout placement may.
            None if phase == MatchPhase::LastResort => {}
            Some(advertiser) => {
                drop(order);
                if let Ok((_, mut advertiser_order)) = self.orders.get_mut(advertiser) {
                    if let Some(advertisement) = advertiser_order.advertisement_mut() {
                        advertisement.load.push(cargo);
                    }
                }
            }
            None => {
                let value = objective(&self.weights, cargo.origin, &vehicle);
                let score = fitness(value);
                vehicle.objective = Some(value);
                vehicle.fitness = Some(score);
                order.role = OrderRole::Advertiser(Advertisement {
                    fitness: score,
                    capacity: vehicle.capacity,
                    load: vehicle.load.clone(),
                });
                self.advertisers.insert(vehicle_entity, order_entity);
                debug!(
                    order_id = cargo.order_id,
                    vehicle_id = vehicle.id,
                    fitness = score,
                    "advertiser promoted"
                );
            }
        }

        debug!(
            order_id = cargo.order_id,
            vehicle_id = vehicle.id,
            ?phase,
            loaded = vehicle.loaded_volume(),
            capacity = vehicle.capacity,
            "order placed"
        );
        self.telemetry.placements.push(PlacementRecord {
            tick: self.tick,
            order_id: cargo.order_id,
            vehicle_id: vehicle.id,
            phase,
        });
        true
    }

    /// Rescores a vehicle after an onlooker joined it and republishes the score.
    fn refresh_fitness(&mut self, advertiser: Entity, vehicle_entity: Entity) {
        let Ok((_, mut vehicle)) = self.vehicles.get_mut(vehicle_entity) else {
            return;
        };
        let Ok((_, mut advertiser_order)) = self.orders.get_mut(advertiser) else {
            return;
        };
        let value = objective(&self.weights, advertiser_order.origin, &vehicle);
        let score = fitness(value);
        vehicle.objective = Some(value);
        vehicle.fitness = Some(score);
        if let Some(advertisement) = advertiser_order.advertisement_mut() {
            advertisement.fitness = score;
        }
    }
}
