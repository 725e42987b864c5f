use std::fs::File;
use std::io::{BufWriter, Write};

use serde::Serialize;

use crate::metrics::{LoadStatistics, SimulationResult};

pub(crate) fn export_to_json_impl(
    results: &[SimulationResult],
    file: File,
) -> Result<(), Box<dyn std::error::Error>> {
    write_pretty(results, file)
}

/// The per-run `processed_data` document.
pub(crate) fn write_load_statistics(
    stats: &LoadStatistics,
    file: File,
) -> Result<(), Box<dyn std::error::Error>> {
    write_pretty(stats, file)
}

fn write_pretty<T: Serialize + ?Sized>(
    value: &T,
    file: File,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}
