use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;

use crate::metrics::SimulationResult;

pub(crate) fn export_to_parquet_impl(
    results: &[SimulationResult],
    file: std::fs::File,
) -> Result<(), Box<dyn std::error::Error>> {
    let batch = build_record_batch(results)?;
    let props = WriterProperties::builder().build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
    writer.write(&batch)?;
    writer.close()?;

    Ok(())
}

fn build_record_batch(
    results: &[SimulationResult],
) -> Result<RecordBatch, arrow::error::ArrowError> {
    let schema = Arc::new(parquet_schema());
    let arrays = build_arrays(results);

    RecordBatch::try_new(schema, arrays)
}

const COUNT_COLUMNS: [&str; 13] = [
    "total_orders",
    "total_vehicles",
    "delivered_orders",
    "ticks",
    "loaded_drives",
    "reposition_drives",
    "max_load",
    "max_delivery_tick",
    "onlooker_placements",
    "scout_placements",
    "last_resort_placements",
    "fleet_requests",
    "deferrals",
];

const RATIO_COLUMNS: [&str; 5] = [
    "avg_load_per_drive",
    "avg_unused_capacity_per_drive",
    "avg_load_pct_of_max",
    "avg_load_pct_of_capacity",
    "avg_delivery_tick",
];

fn parquet_schema() -> Schema {
    let mut fields = vec![Field::new("terminated", DataType::Boolean, false)];
    fields.extend(
        COUNT_COLUMNS
            .iter()
            .map(|name| Field::new(*name, DataType::UInt64, false)),
    );
    fields.extend(
        RATIO_COLUMNS
            .iter()
            .map(|name| Field::new(*name, DataType::Float64, false)),
    );
    Schema::new(fields)
}

fn count_values(result: &SimulationResult) -> [u64; 13] {
    [
        result.total_orders as u64,
        result.total_vehicles as u64,
        result.delivered_orders as u64,
        result.ticks,
        result.loaded_drives as u64,
        result.reposition_drives as u64,
        u64::from(result.max_load),
        result.max_delivery_tick,
        result.onlooker_placements as u64,
        result.scout_placements as u64,
        result.last_resort_placements as u64,
        result.fleet_requests as u64,
        result.deferrals as u64,
    ]
}

fn ratio_values(result: &SimulationResult) -> [f64; 5] {
    [
        result.avg_load_per_drive,
        result.avg_unused_capacity_per_drive,
        result.avg_load_pct_of_max,
        result.avg_load_pct_of_capacity,
        result.avg_delivery_tick,
    ]
}

fn build_arrays(results: &[SimulationResult]) -> Vec<ArrayRef> {
    let counts: Vec<[u64; 13]> = results.iter().map(count_values).collect();
    let ratios: Vec<[f64; 5]> = results.iter().map(ratio_values).collect();

    let mut arrays: Vec<ArrayRef> = vec![Arc::new(BooleanArray::from(
        results.iter().map(|r| r.terminated).collect::<Vec<_>>(),
    ))];
    for column in 0..COUNT_COLUMNS.len() {
        arrays.push(Arc::new(UInt64Array::from(
            counts.iter().map(|row| row[column]).collect::<Vec<_>>(),
        )));
    }
    for column in 0..RATIO_COLUMNS.len() {
        arrays.push(Arc::new(Float64Array::from(
            ratios.iter().map(|row| row[column]).collect::<Vec<_>>(),
        )));
    }
    arrays
}
