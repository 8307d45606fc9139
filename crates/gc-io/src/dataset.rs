//! Weighted point datasets (customers, competitors).
//!
//! # CSV format
//!
//! ```csv
//! lat,lon,weight
//! 41.3851,2.1734,120
//! 41.3902,2.1540,85
//! ```
//!
//! `lng`/`longitude`, `latitude`, and `count`/`area` are accepted as header
//! aliases.
//!
//! # JSON format
//!
//! An array of `[lat, lon, weight]` triples:
//!
//! ```json
//! [[41.3851, 2.1734, 120], [41.3902, 2.1540, 85]]
//! ```
//!
//! A record with a missing or non-numeric field, a non-finite coordinate, or
//! a negative weight fails the whole load with [`DataError::Malformed`].

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use gc_core::WeightedPoint;

use crate::{DataError, DataResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct PointRecord {
    #[serde(alias = "latitude")]
    lat:    f64,
    #[serde(alias = "lng", alias = "longitude")]
    lon:    f64,
    #[serde(alias = "count", alias = "area")]
    weight: f64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a dataset, choosing the format by extension (`.json` → JSON,
/// anything else → CSV).
pub fn load_points(path: &Path) -> DataResult<Vec<WeightedPoint>> {
    let file = BufReader::new(File::open(path)?);
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let points = if is_json { read_points_json(file)? } else { read_points_csv(file)? };
    log::debug!("loaded {} points from {}", points.len(), path.display());
    Ok(points)
}

/// Parse a `lat,lon,weight` CSV from any `Read` source.
pub fn read_points_csv<R: Read>(reader: R) -> DataResult<Vec<WeightedPoint>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut points = Vec::new();

    for (record, row) in csv_reader.deserialize::<PointRecord>().enumerate() {
        let row = row.map_err(|e| DataError::Malformed { record, reason: e.to_string() })?;
        points.push(validated(record, row.lat, row.lon, row.weight)?);
    }
    Ok(points)
}

/// Parse a JSON array of `[lat, lon, weight]` triples from any `Read`
/// source.
pub fn read_points_json<R: Read>(reader: R) -> DataResult<Vec<WeightedPoint>> {
    let rows: Vec<Value> = serde_json::from_reader(reader)?;

    rows.iter()
        .enumerate()
        .map(|(record, row)| {
            let fields = match row.as_array() {
                Some(fields) if fields.len() == 3 => fields,
                _ => {
                    return Err(DataError::Malformed {
                        record,
                        reason: format!("expected [lat, lon, weight], got {row}"),
                    });
                }
            };
            let number = |i: usize, name: &str| {
                fields[i].as_f64().ok_or_else(|| DataError::Malformed {
                    record,
                    reason: format!("{name} is not a number: {}", fields[i]),
                })
            };
            validated(record, number(0, "lat")?, number(1, "lon")?, number(2, "weight")?)
        })
        .collect()
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn validated(record: usize, lat: f64, lon: f64, weight: f64) -> DataResult<WeightedPoint> {
    WeightedPoint::try_new(lat, lon, weight)
        .map_err(|e| DataError::Malformed { record, reason: e.to_string() })
}
