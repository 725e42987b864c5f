use std::error::Error;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, StringArray, UInt32Array, UInt64Array, UInt8Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use crate::matching::MatchPhase;
use crate::telemetry::{FreightTelemetry, TickSnapshots};

/// Order ids of a dispatch, `;`-separated. Empty for repositioning legs.
pub fn join_order_ids(order_ids: &[u32]) -> String {
    order_ids
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(";")
}

pub fn write_dispatches_parquet<P: AsRef<Path>>(
    path: P,
    telemetry: &FreightTelemetry,
) -> Result<(), Box<dyn Error>> {
    let len = telemetry.dispatches.len();
    let mut tick = Vec::with_capacity(len);
    let mut vehicle_id = Vec::with_capacity(len);
    let mut origin_region = Vec::with_capacity(len);
    let mut destination_region = Vec::with_capacity(len);
    let mut order_ids = Vec::with_capacity(len);
    let mut total_volume = Vec::with_capacity(len);

    for record in &telemetry.dispatches {
        tick.push(record.tick);
        vehicle_id.push(record.vehicle_id);
        origin_region.push(record.origin_region.0);
        destination_region.push(record.destination_region.0);
        order_ids.push(join_order_ids(&record.order_ids));
        total_volume.push(record.total_volume);
    }

    let schema = Schema::new(vec![
        Field::new("tick", DataType::UInt64, false),
        Field::new("vehicle_id", DataType::UInt32, false),
        Field::new("origin_region", DataType::UInt32, false),
        Field::new("destination_region", DataType::UInt32, false),
        Field::new("order_ids", DataType::Utf8, false),
        Field::new("total_volume", DataType::UInt32, false),
    ]);

    let arrays: Vec<ArrayRef> = vec![
        Arc::new(UInt64Array::from(tick)),
        Arc::new(UInt32Array::from(vehicle_id)),
        Arc::new(UInt32Array::from(origin_region)),
        Arc::new(UInt32Array::from(destination_region)),
        Arc::new(StringArray::from(order_ids)),
        Arc::new(UInt32Array::from(total_volume)),
    ];

    write_record_batch(path, schema, arrays)
}

pub fn write_deliveries_parquet<P: AsRef<Path>>(
    path: P,
    telemetry: &FreightTelemetry,
) -> Result<(), Box<dyn Error>> {
    let len = telemetry.deliveries.len();
    let mut tick = Vec::with_capacity(len);
    let mut order_id = Vec::with_capacity(len);
    let mut origin = Vec::with_capacity(len);
    let mut destination = Vec::with_capacity(len);
    let mut vehicle_id = Vec::with_capacity(len);
    let mut volume = Vec::with_capacity(len);

    for record in &telemetry.deliveries {
        tick.push(record.tick);
        order_id.push(record.order_id);
        origin.push(record.origin.0);
        destination.push(record.destination.0);
        vehicle_id.push(record.vehicle_id);
        volume.push(record.volume);
    }

    let schema = Schema::new(vec![
        Field::new("tick", DataType::UInt64, false),
        Field::new("order_id", DataType::UInt32, false),
        Field::new("origin", DataType::UInt32, false),
        Field::new("destination", DataType::UInt32, false),
        Field::new("vehicle_id", DataType::UInt32, false),
        Field::new("volume", DataType::UInt32, false),
    ]);

    let arrays: Vec<ArrayRef> = vec![
        Arc::new(UInt64Array::from(tick)),
        Arc::new(UInt32Array::from(order_id)),
        Arc::new(UInt32Array::from(origin)),
        Arc::new(UInt32Array::from(destination)),
        Arc::new(UInt32Array::from(vehicle_id)),
        Arc::new(UInt32Array::from(volume)),
    ];

    write_record_batch(path, schema, arrays)
}

pub fn write_placements_parquet<P: AsRef<Path>>(
    path: P,
    telemetry: &FreightTelemetry,
) -> Result<(), Box<dyn Error>> {
    let len = telemetry.placements.len();
    let mut tick = Vec::with_capacity(len);
    let mut order_id = Vec::with_capacity(len);
    let mut vehicle_id = Vec::with_capacity(len);
    let mut phase = Vec::with_capacity(len);

    for record in &telemetry.placements {
        tick.push(record.tick);
        order_id.push(record.order_id);
        vehicle_id.push(record.vehicle_id);
        phase.push(phase_code(record.phase));
    }

    let schema = Schema::new(vec![
        Field::new("tick", DataType::UInt64, false),
        Field::new("order_id", DataType::UInt32, false),
        Field::new("vehicle_id", DataType::UInt32, false),
        Field::new("phase", DataType::UInt8, false),
    ]);

    let arrays: Vec<ArrayRef> = vec![
        Arc::new(UInt64Array::from(tick)),
        Arc::new(UInt32Array::from(order_id)),
        Arc::new(UInt32Array::from(vehicle_id)),
        Arc::new(UInt8Array::from(phase)),
    ];

    write_record_batch(path, schema, arrays)
}

pub fn write_snapshot_counts_parquet<P: AsRef<Path>>(
    path: P,
    snapshots: &TickSnapshots,
) -> Result<(), Box<dyn Error>> {
    let len = snapshots.snapshots.len();
    let mut tick = Vec::with_capacity(len);
    let mut orders_unplaced = Vec::with_capacity(len);
    let mut orders_placed = Vec::with_capacity(len);
    let mut orders_delivered = Vec::with_capacity(len);
    let mut vehicles_collecting = Vec::with_capacity(len);
    let mut vehicles_traveling_loaded = Vec::with_capacity(len);
    let mut vehicles_traveling_empty = Vec::with_capacity(len);

    for snapshot in &snapshots.snapshots {
        let counts = &snapshot.counts;
        tick.push(snapshot.tick);
        orders_unplaced.push(counts.orders_unplaced as u64);
        orders_placed.push(counts.orders_placed as u64);
        orders_delivered.push(counts.orders_delivered as u64);
        vehicles_collecting.push(counts.vehicles_collecting as u64);
        vehicles_traveling_loaded.push(counts.vehicles_traveling_loaded as u64);
        vehicles_traveling_empty.push(counts.vehicles_traveling_empty as u64);
    }

    let schema = Schema::new(vec![
        Field::new("tick", DataType::UInt64, false),
        Field::new("orders_unplaced", DataType::UInt64, false),
        Field::new("orders_placed", DataType::UInt64, false),
        Field::new("orders_delivered", DataType::UInt64, false),
        Field::new("vehicles_collecting", DataType::UInt64, false),
        Field::new("vehicles_traveling_loaded", DataType::UInt64, false),
        Field::new("vehicles_traveling_empty", DataType::UInt64, false),
    ]);

    let arrays: Vec<ArrayRef> = vec![
        Arc::new(UInt64Array::from(tick)),
        Arc::new(UInt64Array::from(orders_unplaced)),
        Arc::new(UInt64Array::from(orders_placed)),
        Arc::new(UInt64Array::from(orders_delivered)),
        Arc::new(UInt64Array::from(vehicles_collecting)),
        Arc::new(UInt64Array::from(vehicles_traveling_loaded)),
        Arc::new(UInt64Array::from(vehicles_traveling_empty)),
    ];

    write_record_batch(path, schema, arrays)
}

fn phase_code(phase: MatchPhase) -> u8 {
    match phase {
        MatchPhase::Onlooker => 0,
        MatchPhase::Scout => 1,
        MatchPhase::LastResort => 2,
    }
}

fn write_record_batch<P: AsRef<Path>>(
    path: P,
    schema: Schema,
    arrays: Vec<ArrayRef>,
) -> Result<(), Box<dyn Error>> {
    let schema = Arc::new(schema);
    let batch = RecordBatch::try_new(schema.clone(), arrays)?;
    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}
