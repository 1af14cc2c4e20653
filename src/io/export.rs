//! CSV export for report samples.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::node::PowerBalance;

/// Column header for CSV telemetry export.
const HEADER: &str = "report,house_load,turbine_load,battery_load,total_load,state_of_charge";

/// Exports report samples to a CSV file at the given path.
///
/// Writes a header row followed by one row per report, numbered from 0.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(samples: &[PowerBalance], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(samples, buf)
}

/// Writes report samples as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(samples: &[PowerBalance], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;

    for (i, s) in samples.iter().enumerate() {
        wtr.write_record(&[
            i.to_string(),
            s.house_load.to_string(),
            s.turbine_load.to_string(),
            s.battery_load.to_string(),
            s.total_load.to_string(),
            s.state_of_charge.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
