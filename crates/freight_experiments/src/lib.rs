//! Parallel experimentation framework for freight consolidation parameter sweeps.
//!
//! This crate runs many seeded simulations in parallel with varying parameters,
//! extracts load-per-drive metrics, and exports results and per-run event logs.
//!
//! # Quick Start
//!
//! ```no_run
//! use freight_experiments::{find_best_result_index, run_parallel_experiments, ParameterSpace};
//! use freight_core::scenario::ActivationOrder;
//!
//! // Define parameter space (grid search)
//! let space = ParameterSpace::grid()
//!     .activation(vec![ActivationOrder::CreationOrder, ActivationOrder::Shuffled])
//!     .order_countdown(vec![5, 10, 20])
//!     .runs(4);
//!
//! // Generate parameter sets
//! let parameter_sets = space.generate();
//!
//! // Run experiments in parallel
//! let artifacts = run_parallel_experiments(&parameter_sets, None).unwrap();
//! let results: Vec<_> = artifacts.into_iter().map(|a| a.metrics).collect();
//! let best_idx = find_best_result_index(&results).unwrap();
//! ```
//!
//! # Architecture
//!
//! - [`parameters`]: Parameter variation framework (grid search, random sampling)
//! - [`runner`]: Parallel simulation execution using rayon
//! - [`metrics`]: Load-per-drive and completion metrics
//! - [`export`]: Result export to CSV/JSON/Parquet and per-run event logs

pub mod export;
pub mod metrics;
pub mod parameter_spaces;
pub mod parameters;
pub mod runner;

pub use export::{
    export_event_logs, export_to_csv, export_to_json, export_to_parquet, find_best_parameters,
    find_best_result_index,
};
pub use metrics::{LoadStatistics, SimulationResult};
pub use parameters::{InstanceSource, ParameterSet, ParameterSpace};
pub use runner::{run_parallel_experiments, SimulationArtifacts};
