//! Road network from a pair of CSV files.
//!
//! # Nodes
//!
//! ```csv
//! id,lat,lon
//! 1001,41.3851,2.1734
//! 1002,41.3860,2.1750
//! ```
//!
//! `id` is any unsigned integer; ids need not be dense or sorted.
//!
//! # Edges
//!
//! ```csv
//! from,to,length_m,oneway
//! 1001,1002,162.4,false
//! 1002,1003,,
//! ```
//!
//! `length_m` is optional; when empty the haversine distance between the two
//! endpoints is used.  `oneway` is optional and defaults to `false`
//! (walkable segments are two-way).

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;

use gc_core::{GeoPoint, NodeId};
use gc_spatial::{RoadNetwork, RoadNetworkBuilder};

use crate::{DataError, DataResult};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NodeRecord {
    id:  u64,
    lat: f64,
    #[serde(alias = "lng")]
    lon: f64,
}

#[derive(Deserialize)]
struct EdgeRecord {
    from:     u64,
    to:       u64,
    #[serde(default)]
    length_m: Option<f64>,
    #[serde(default)]
    oneway:   Option<bool>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`RoadNetwork`] from a nodes CSV and an edges CSV.
pub fn load_network_csv(nodes: &Path, edges: &Path) -> DataResult<RoadNetwork> {
    let net = read_network_csv(
        BufReader::new(File::open(nodes)?),
        BufReader::new(File::open(edges)?),
    )?;
    log::info!(
        "road network: {} nodes, {} directed edges ({})",
        net.node_count(),
        net.edge_count(),
        nodes.display()
    );
    Ok(net)
}

/// Like [`load_network_csv`] but accepts any `Read` sources.
pub fn read_network_csv<N: Read, E: Read>(nodes: N, edges: E) -> DataResult<RoadNetwork> {
    let mut builder = RoadNetworkBuilder::new();
    let mut by_ext: HashMap<u64, NodeId> = HashMap::new();

    // ── Nodes ─────────────────────────────────────────────────────────────
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(nodes);
    for (record, row) in rdr.deserialize::<NodeRecord>().enumerate() {
        let row = row.map_err(|e| DataError::Malformed { record, reason: e.to_string() })?;
        let pos = GeoPoint::new(row.lat, row.lon);
        if !pos.is_finite() {
            return Err(DataError::Malformed { record, reason: format!("node {}: non-finite position", row.id) });
        }
        if by_ext.contains_key(&row.id) {
            return Err(DataError::Malformed { record, reason: format!("duplicate node id {}", row.id) });
        }
        by_ext.insert(row.id, builder.add_node(pos));
    }

    // ── Edges ─────────────────────────────────────────────────────────────
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(edges);
    for (record, row) in rdr.deserialize::<EdgeRecord>().enumerate() {
        let row = row.map_err(|e| DataError::Malformed { record, reason: e.to_string() })?;
        let resolve = |ext: u64| {
            by_ext.get(&ext).copied().ok_or_else(|| DataError::Malformed {
                record,
                reason: format!("edge references unknown node {ext}"),
            })
        };
        let (from, to) = (resolve(row.from)?, resolve(row.to)?);

        let length_m = match row.length_m {
            Some(len) if len.is_finite() && len >= 0.0 => len,
            Some(len) => {
                return Err(DataError::Malformed { record, reason: format!("invalid length_m {len}") });
            }
            None => match (builder.position(from), builder.position(to)) {
                (Some(a), Some(b)) => a.distance_m(b),
                _ => 0.0,
            },
        };

        if row.oneway.unwrap_or(false) {
            builder.add_directed_edge(from, to, length_m);
        } else {
            builder.add_road(from, to, length_m);
        }
    }

    Ok(builder.build())
}
