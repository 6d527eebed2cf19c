//! CSV export of merged incident records.

use roadwatch_core::RecordSet;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::error::Result;

pub const HEADER: [&str; 5] = ["Roadway", "Incidents", "Reason", "Location", "Time"];

/// Write the header and one row per record, in first-seen road order.
pub fn write_records<W: Write>(records: &RecordSet, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(HEADER)?;

    for record in records {
        let incidents = record.incidents_summary();
        csv.write_record([
            record.road_id.as_str(),
            incidents.as_str(),
            record.cause.as_str(),
            record.location.as_str(),
            record.time.as_str(),
        ])?;
    }

    csv.flush()?;
    Ok(())
}

/// Create (or truncate) `path` and write the records to it.
///
/// Returns the number of data rows written.
pub fn export_to_path(records: &RecordSet, path: &Path) -> Result<usize> {
    let file = File::create(path)?;
    write_records(records, file)?;
    info!(path = %path.display(), rows = records.len(), "Wrote CSV export");
    Ok(records.len())
}
