//! CSV export of aggregate records.

use std::path::Path;

use csv::Writer;

use gc_core::AggregateRecord;

use crate::DataResult;

/// Write `records` to `path` as `lat,lon,probability`.
pub fn write_records_csv(path: &Path, records: &[AggregateRecord]) -> DataResult<()> {
    let mut wtr = Writer::from_path(path)?;
    wtr.write_record(["lat", "lon", "probability"])?;
    for r in records {
        wtr.write_record(&[r.lat.to_string(), r.lon.to_string(), r.probability.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}
