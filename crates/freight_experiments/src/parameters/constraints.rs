use super::combinations::ParameterCombination;

/// Returns false for invalid combinations that should be discarded.
///
/// Orders need at least one vehicle, and a zero maximum volume would clamp
/// every generated order to one unit.
pub(super) fn is_valid_combination(combo: &ParameterCombination) -> bool {
    (combo.num_vehicles > 0 || combo.num_orders == 0) && combo.max_order_volume > 0
}
