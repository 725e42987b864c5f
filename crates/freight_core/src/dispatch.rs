//! Dispatch readiness: when a collecting vehicle stops waiting and departs.

use crate::ecs::{RegionId, Vehicle};

/// An unplaced order as seen by the readiness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitingOrder {
    pub origin: RegionId,
    pub destination: RegionId,
    pub volume: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchTrigger {
    /// No unplaced order shares an origin/destination pair with the load.
    NothingToWaitFor,
    /// Free capacity is below the smallest matching unplaced order.
    CannotFitWaiting,
    /// A loaded order's countdown reached zero.
    OrderDue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Ready(DispatchTrigger),
    Collecting,
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        matches!(self, Readiness::Ready(_))
    }
}

/// Evaluates a loaded, collecting vehicle.
///
/// `any_due` reports whether any order in the vehicle's load has a zero countdown.
pub fn dispatch_readiness(vehicle: &Vehicle, waiting: &[WaitingOrder], any_due: bool) -> Readiness {
    let smallest_matching = waiting
        .iter()
        .filter(|order| {
            vehicle
                .load
                .iter()
                .any(|cargo| cargo.origin == order.origin && cargo.destination == order.destination)
        })
        .map(|order| order.volume)
        .min();

    let Some(smallest) = smallest_matching else {
        return Readiness::Ready(DispatchTrigger::NothingToWaitFor);
    };
    if vehicle.remaining_capacity() < smallest {
        Readiness::Ready(DispatchTrigger::CannotFitWaiting)
    } else if any_due {
        Readiness::Ready(DispatchTrigger::OrderDue)
    } else {
        Readiness::Collecting
    }
}

pub fn ready_to_dispatch(vehicle: &Vehicle, waiting: &[WaitingOrder], any_due: bool) -> bool {
    dispatch_readiness(vehicle, waiting, any_due).is_ready()
}
