//! Grouping raw points into grid cells.

use std::collections::BTreeMap;

use gc_core::{CellId, GeoPoint, WeightedPoint};
use gc_spatial::SpatialGrid;

/// One occupied grid cell's population, routed from the cell center.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DemandGroup {
    pub cell:   CellId,
    /// Sum of the weights of every demand point in the cell.
    pub weight: f64,
    pub center: GeoPoint,
}

/// A competitor snapped to its grid cell.  Competitors are not merged: two
/// sites in one cell stay two competitors sharing one routing vertex.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CompetitorSite {
    pub cell:           CellId,
    pub center:         GeoPoint,
    pub attractiveness: f64,
}

/// Sum demand weights per cell.
///
/// Points outside the grid are dropped, as are groups whose summed weight
/// is zero or whose center is not finite.  Output is sorted by `CellId`.
pub fn group_demand(grid: &SpatialGrid, points: &[WeightedPoint]) -> Vec<DemandGroup> {
    let mut by_cell: BTreeMap<CellId, f64> = BTreeMap::new();
    let mut unassigned = 0usize;

    for p in points {
        match grid.assign(p.pos) {
            Some(cell) => *by_cell.entry(cell).or_insert(0.0) += p.weight,
            None => unassigned += 1,
        }
    }
    if unassigned > 0 {
        log::warn!("{unassigned} demand points fall outside the grid and were dropped");
    }

    by_cell
        .into_iter()
        .filter_map(|(cell, weight)| {
            let center = grid.cell(cell)?.center;
            (weight > 0.0 && center.is_finite()).then_some(DemandGroup { cell, weight, center })
        })
        .collect()
}

/// Snap each competitor to its cell, preserving input order.
///
/// Competitors outside the grid are dropped.
pub fn place_competitors(grid: &SpatialGrid, points: &[WeightedPoint]) -> Vec<CompetitorSite> {
    let sites: Vec<CompetitorSite> = points
        .iter()
        .filter_map(|p| {
            let cell = grid.assign(p.pos)?;
            let center = grid.cell(cell)?.center;
            center.is_finite().then_some(CompetitorSite {
                cell,
                center,
                attractiveness: p.weight,
            })
        })
        .collect();

    if sites.len() < points.len() {
        log::warn!(
            "{} competitors fall outside the grid and were dropped",
            points.len() - sites.len()
        );
    }
    sites
}
