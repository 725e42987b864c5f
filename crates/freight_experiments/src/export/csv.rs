use freight_core::telemetry::{DeliveryRecord, DispatchRecord};
use freight_core::telemetry_export::join_order_ids;

use crate::metrics::SimulationResult;
use crate::parameters::ParameterSet;

pub(crate) fn export_to_csv_impl(
    results: &[SimulationResult],
    parameter_sets: &[ParameterSet],
    file: std::fs::File,
) -> Result<(), Box<dyn std::error::Error>> {
    if results.len() != parameter_sets.len() {
        return Err(format!(
            "Results length ({}) doesn't match parameter_sets length ({})",
            results.len(),
            parameter_sets.len()
        )
        .into());
    }

    let mut wtr = csv::Writer::from_writer(file);

    wtr.write_record([
        "experiment_id",
        "run_id",
        "seed",
        "source",
        "activation",
        "order_countdown",
        "num_vehicles",
        "num_orders",
        "max_order_volume",
        "weight_load",
        "weight_position",
        "weight_availability",
        "total_orders",
        "total_vehicles",
        "delivered_orders",
        "terminated",
        "ticks",
        "loaded_drives",
        "reposition_drives",
        "avg_load_per_drive",
        "avg_unused_capacity_per_drive",
        "max_load",
        "avg_load_pct_of_max",
        "avg_load_pct_of_capacity",
        "avg_delivery_tick",
        "max_delivery_tick",
        "onlooker_placements",
        "scout_placements",
        "last_resort_placements",
        "fleet_requests",
        "deferrals",
    ])?;

    for (result, param_set) in results.iter().zip(parameter_sets.iter()) {
        let params = &param_set.params;
        wtr.write_record([
            param_set.experiment_id.clone(),
            param_set.run_id.to_string(),
            param_set.seed.to_string(),
            param_set.source.label().to_string(),
            params.activation.to_string(),
            params.order_countdown.to_string(),
            params.num_vehicles.to_string(),
            params.num_orders.to_string(),
            params.max_order_volume.to_string(),
            params.weights.load.to_string(),
            params.weights.position.to_string(),
            params.weights.availability.to_string(),
            result.total_orders.to_string(),
            result.total_vehicles.to_string(),
            result.delivered_orders.to_string(),
            result.terminated.to_string(),
            result.ticks.to_string(),
            result.loaded_drives.to_string(),
            result.reposition_drives.to_string(),
            result.avg_load_per_drive.to_string(),
            result.avg_unused_capacity_per_drive.to_string(),
            result.max_load.to_string(),
            result.avg_load_pct_of_max.to_string(),
            result.avg_load_pct_of_capacity.to_string(),
            result.avg_delivery_tick.to_string(),
            result.max_delivery_tick.to_string(),
            result.onlooker_placements.to_string(),
            result.scout_placements.to_string(),
            result.last_resort_placements.to_string(),
            result.fleet_requests.to_string(),
            result.deferrals.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

pub(crate) fn write_delivered_orders(
    deliveries: &[DeliveryRecord],
    file: std::fs::File,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_writer(file);
    wtr.write_record([
        "tick",
        "order_id",
        "origin",
        "destination",
        "vehicle_id",
        "volume",
    ])?;
    for delivery in deliveries {
        wtr.write_record([
            delivery.tick.to_string(),
            delivery.order_id.to_string(),
            delivery.origin.to_string(),
            delivery.destination.to_string(),
            delivery.vehicle_id.to_string(),
            delivery.volume.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Reposition legs are written with an empty order list and zero volume.
pub(crate) fn write_dispatched_vehicles(
    dispatches: &[DispatchRecord],
    file: std::fs::File,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_writer(file);
    wtr.write_record([
        "tick",
        "vehicle_id",
        "origin_region",
        "destination_region",
        "order_ids",
        "total_volume",
    ])?;
    for dispatch in dispatches {
        wtr.write_record([
            dispatch.tick.to_string(),
            dispatch.vehicle_id.to_string(),
            dispatch.origin_region.to_string(),
            dispatch.destination_region.to_string(),
            join_order_ids(&dispatch.order_ids),
            dispatch.total_volume.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
