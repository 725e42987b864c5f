pub mod clock;
pub mod dispatch;
pub mod ecs;
pub mod invariants;
pub mod matching;
pub mod runner;
pub mod scenario;
pub mod systems;
pub mod telemetry;
pub mod telemetry_export;
#[cfg(feature = "test-helpers")]
pub mod test_helpers;
pub mod topology;
