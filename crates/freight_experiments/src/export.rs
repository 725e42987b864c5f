//! Result export and analysis utilities.
//!
//! This module provides functions to export experiment results to Parquet,
//! JSON and CSV, per-run event logs, and to find the best parameter set.

use std::path::{Path, PathBuf};

use crate::metrics::SimulationResult;
use crate::parameters::ParameterSet;
use crate::runner::SimulationArtifacts;

#[path = "export/csv.rs"]
mod csv;
#[path = "export/json.rs"]
mod json;
#[path = "export/parquet.rs"]
mod parquet;
#[path = "export/ranking.rs"]
mod ranking;
#[path = "export/writer_utils.rs"]
mod writer_utils;

/// Export simulation results to Parquet format.
///
/// Creates a Parquet file with columns for all metrics in `SimulationResult`.
///
/// # Errors
///
/// Returns an error if file creation or Parquet writing fails.
pub fn export_to_parquet(
    results: &[SimulationResult],
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    writer_utils::ensure_not_empty(results)?;
    let file = writer_utils::create_output_file(path)?;
    parquet::export_to_parquet_impl(results, file)
}

/// Export simulation results to JSON format.
///
/// Creates a JSON file with an array of all results (serialized as JSON objects).
///
/// # Errors
///
/// Returns an error if file creation or JSON serialization fails.
pub fn export_to_json(
    results: &[SimulationResult],
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = writer_utils::create_output_file(path)?;
    json::export_to_json_impl(results, file)
}

/// Export simulation results with parameters to CSV format.
///
/// Parameters and results are paired by index (results[i] corresponds to
/// parameter_sets[i]).
///
/// # Errors
///
/// Returns an error if file creation or CSV writing fails, or if results and
/// parameter_sets lengths don't match.
pub fn export_to_csv(
    results: &[SimulationResult],
    parameter_sets: &[ParameterSet],
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    writer_utils::ensure_not_empty(results)?;
    let file = writer_utils::create_output_file(path)?;
    csv::export_to_csv_impl(results, parameter_sets, file)
}

/// Write one run's event logs into `dir`:
/// `<prefix>_delivered_orders.csv`, `<prefix>_dispatched_vehicles.csv` and
/// `<prefix>_processed_data.json` (load-per-drive statistics).
///
/// Returns the written paths in that order.
pub fn export_event_logs(
    artifacts: &SimulationArtifacts,
    param_set: &ParameterSet,
    dir: impl AsRef<Path>,
) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let dir = dir.as_ref();
    let prefix = param_set.file_prefix();

    let deliveries = dir.join(format!("{prefix}_delivered_orders.csv"));
    csv::write_delivered_orders(
        &artifacts.deliveries,
        writer_utils::create_output_file(&deliveries)?,
    )?;

    let dispatches = dir.join(format!("{prefix}_dispatched_vehicles.csv"));
    csv::write_dispatched_vehicles(
        &artifacts.dispatches,
        writer_utils::create_output_file(&dispatches)?,
    )?;

    let processed = dir.join(format!("{prefix}_processed_data.json"));
    json::write_load_statistics(
        &artifacts.load,
        writer_utils::create_output_file(&processed)?,
    )?;

    Ok(vec![deliveries, dispatches, processed])
}

/// Find the parameter set of the best run (see [`find_best_result_index`]).
pub fn find_best_parameters<'a>(
    results: &'a [SimulationResult],
    parameter_sets: &'a [ParameterSet],
) -> Option<&'a ParameterSet> {
    ranking::find_best_parameters_impl(results, parameter_sets)
}

/// Index of the best run: completed runs first, then fewest ticks, then the
/// highest average load relative to capacity.
pub fn find_best_result_index(results: &[SimulationResult]) -> Option<usize> {
    ranking::find_best_index(results)
}
