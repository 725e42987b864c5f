use std::cmp::Ordering;

use crate::metrics::SimulationResult;
use crate::parameters::ParameterSet;

/// Orders results so that the better one compares greater.
fn compare_results(a: &SimulationResult, b: &SimulationResult) -> Ordering {
    a.terminated
        .cmp(&b.terminated)
        .then_with(|| b.ticks.cmp(&a.ticks))
        .then_with(|| {
            a.avg_load_pct_of_capacity
                .partial_cmp(&b.avg_load_pct_of_capacity)
                .unwrap_or(Ordering::Equal)
        })
}

pub(crate) fn find_best_index(results: &[SimulationResult]) -> Option<usize> {
    results
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| compare_results(a, b))
        .map(|(idx, _)| idx)
}

pub(crate) fn find_best_parameters_impl<'a>(
    results: &'a [SimulationResult],
    parameter_sets: &'a [ParameterSet],
) -> Option<&'a ParameterSet> {
    if results.is_empty() || results.len() != parameter_sets.len() {
        return None;
    }

    let best_idx = find_best_index(results)?;
    parameter_sets.get(best_idx)
}
