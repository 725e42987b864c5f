pub mod completion;
pub mod fleet_request;
pub mod order_matching;
pub mod region_index;
pub mod telemetry_snapshot;
pub mod vehicle_arrival;
pub mod vehicle_dispatch;
