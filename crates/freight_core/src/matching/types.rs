use bevy_ecs::prelude::Entity;

/// Which phase of the decision procedure placed an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MatchPhase {
    Onlooker,
    Scout,
    /// Scout pool exhausted; the order went to an empty vehicle at its origin.
    LastResort,
}

/// Why an unplaced order stays unplaced this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DeferralReason {
    /// No vehicle occupies the order's origin.
    NoVehiclePresent,
    /// Vehicles are present but none is empty and none shares the destination.
    NoEligibleVehicle,
    /// Every candidate lacked the capacity for the order.
    NoCapacity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Placed { vehicle: Entity, phase: MatchPhase },
    Deferred(DeferralReason),
}
