//! Fixed-size square grid over a bounding box.
//!
//! # Tiling
//!
//! The box is cut into latitude rows of `cell_size_m / 111 000` degrees,
//! starting at the minimum corner.  Each row is then cut into cells whose
//! longitude width is `cell_size_m / (cos(lat) × 111 000)` degrees, where
//! `lat` is the row's lower edge, so cells stay roughly square on the ground
//! and every row has its own column count.
//!
//! ```text
//!   row 1 │ 3 │ 4 │ 5 │ 6 │        ids are sequential: rows bottom-up,
//!   row 0 │ 0 │ 1  │ 2  │          cells west → east within a row
//!         min corner
//! ```
//!
//! Tiling continues while a row's (or cell's) lower edge is still inside the
//! box, so the last row and column may overshoot the box.  A degenerate box
//! (single point) still yields one cell.  Grids larger than [`MAX_CELLS`]
//! are refused up front.
//!
//! # Containment
//!
//! Cells are half-open, `min ≤ x < max`, so a point on a shared edge belongs
//! to the cell above / east of it.  The outer max edge of the box is closed:
//! a point exactly on it falls into the last row / column.  Assignment is an
//! O(1) index computation over the same arithmetic that built the cells.

use gc_core::{CellId, GeoPoint};

use crate::{SpatialError, SpatialResult};

/// Approximate length of one degree of latitude, metres.
pub const METRES_PER_DEGREE: f64 = 111_000.0;

/// Largest grid [`SpatialGrid::new`] will build.  A city-sized box at
/// 100 m is around 10⁴ cells; boxes stretched by a stray far-away point
/// run into the millions and are rejected before anything is allocated.
pub const MAX_CELLS: usize = 2_000_000;

// ── BoundingBox ───────────────────────────────────────────────────────────────

/// Closed latitude/longitude rectangle.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    /// South-west corner (minimum latitude and longitude).
    pub min: GeoPoint,
    /// North-east corner (maximum latitude and longitude).
    pub max: GeoPoint,
}

impl BoundingBox {
    pub fn new(min: GeoPoint, max: GeoPoint) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every finite point in `points`.
    ///
    /// Returns `None` if there are no finite points.
    pub fn enclosing<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = GeoPoint>,
    {
        points
            .into_iter()
            .filter(|p| p.is_finite())
            .fold(None, |acc: Option<BoundingBox>, p| {
                Some(match acc {
                    None => BoundingBox::new(p, p),
                    Some(b) => BoundingBox::new(
                        GeoPoint::new(b.min.lat.min(p.lat), b.min.lon.min(p.lon)),
                        GeoPoint::new(b.max.lat.max(p.lat), b.max.lon.max(p.lon)),
                    ),
                })
            })
    }

    /// Closed containment test (both edges inclusive).
    #[inline]
    pub fn contains(&self, p: GeoPoint) -> bool {
        p.lat >= self.min.lat
            && p.lat <= self.max.lat
            && p.lon >= self.min.lon
            && p.lon <= self.max.lon
    }
}

// ── GridCell ──────────────────────────────────────────────────────────────────

/// One square of the grid.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridCell {
    pub id:     CellId,
    /// South-west corner.
    pub min:    GeoPoint,
    /// North-east corner.
    pub max:    GeoPoint,
    /// Midpoint of the cell; used as the routing point for everything
    /// assigned to it.
    pub center: GeoPoint,
}

// ── SpatialGrid ───────────────────────────────────────────────────────────────

/// Bookkeeping for one latitude row.
#[derive(Clone, Debug)]
struct GridRow {
    lon_step: f64,
    /// Index of the row's first cell in `SpatialGrid::cells`.
    first:    u32,
    cols:     u32,
}

/// Immutable grid of [`GridCell`]s over a [`BoundingBox`].
///
/// Built once per computation; changing the cell size means building a new
/// grid (and new downstream caches, since they are keyed by `CellId`).
#[derive(Clone, Debug)]
pub struct SpatialGrid {
    bbox:        BoundingBox,
    cell_size_m: f64,
    lat_step:    f64,
    rows:        Vec<GridRow>,
    cells:       Vec<GridCell>,
}

impl SpatialGrid {
    /// Tile `bbox` with cells of `cell_size_m` metres.
    ///
    /// # Errors
    ///
    /// [`SpatialError::InvalidGrid`] if the cell size is not a positive
    /// finite number, the box is inverted or not finite, a row reaches a
    /// pole, or the grid would exceed [`MAX_CELLS`] cells.
    pub fn new(bbox: BoundingBox, cell_size_m: f64) -> SpatialResult<Self> {
        if !cell_size_m.is_finite() || cell_size_m <= 0.0 {
            return Err(SpatialError::InvalidGrid(format!(
                "cell size must be positive, got {cell_size_m}"
            )));
        }
        if !bbox.min.is_finite() || !bbox.max.is_finite() {
            return Err(SpatialError::InvalidGrid("bounding box is not finite".into()));
        }
        if bbox.min.lat > bbox.max.lat || bbox.min.lon > bbox.max.lon {
            return Err(SpatialError::InvalidGrid(format!(
                "inverted bounding box {} .. {}",
                bbox.min, bbox.max
            )));
        }

        let lat_step = cell_size_m / METRES_PER_DEGREE;

        // Size check in f64 before any allocation.  The row whose lower edge
        // is farthest from the equator has the narrowest cells, so its column
        // count bounds every other row's.
        let rows_f = ((bbox.max.lat - bbox.min.lat) / lat_step).ceil().max(1.0);
        let top_lat = bbox.min.lat + (rows_f - 1.0) * lat_step;
        let widest_lat = bbox.min.lat.abs().max(top_lat.abs());
        let min_scale = widest_lat.to_radians().cos();
        if widest_lat >= 90.0 || min_scale <= f64::EPSILON {
            return Err(SpatialError::InvalidGrid(format!(
                "row at latitude ±{widest_lat} reaches a pole"
            )));
        }
        let narrowest_step = cell_size_m / (min_scale * METRES_PER_DEGREE);
        let max_cols = ((bbox.max.lon - bbox.min.lon) / narrowest_step).ceil().max(1.0);
        let estimate = rows_f * max_cols;
        if estimate > MAX_CELLS as f64 {
            return Err(SpatialError::InvalidGrid(format!(
                "{cell_size_m} m cells over {} .. {} would need about {estimate:.0} cells (limit {MAX_CELLS}); \
                 set explicit bounds or a larger cell size",
                bbox.min, bbox.max
            )));
        }

        let row_count = rows_f as usize;
        let mut rows  = Vec::with_capacity(row_count);
        let mut cells = Vec::new();

        for r in 0..row_count {
            let min_lat = bbox.min.lat + r as f64 * lat_step;
            let max_lat = min_lat + lat_step;

            let lon_step = cell_size_m / (min_lat.to_radians().cos() * METRES_PER_DEGREE);
            let cols = span_count(bbox.max.lon - bbox.min.lon, lon_step);

            let first = cell_id(cells.len())?;
            for c in 0..cols {
                let min_lon = bbox.min.lon + c as f64 * lon_step;
                let max_lon = min_lon + lon_step;
                cells.push(GridCell {
                    id:     cell_id(cells.len())?,
                    min:    GeoPoint::new(min_lat, min_lon),
                    max:    GeoPoint::new(max_lat, max_lon),
                    center: GeoPoint::new(min_lat + lat_step * 0.5, min_lon + lon_step * 0.5),
                });
            }
            rows.push(GridRow { lon_step, first: first.0, cols: cols as u32 });
        }

        log::debug!(
            "grid: {} rows, {} cells of {cell_size_m} m over {} .. {}",
            rows.len(),
            cells.len(),
            bbox.min,
            bbox.max
        );

        Ok(Self { bbox, cell_size_m, lat_step, rows, cells })
    }

    /// The unique cell containing `p`, or `None` if `p` is outside the box
    /// (or not finite).  Callers drop unassigned points.
    pub fn assign(&self, p: GeoPoint) -> Option<CellId> {
        if !p.is_finite() || !self.bbox.contains(p) {
            return None;
        }
        let r = bucket(p.lat - self.bbox.min.lat, self.lat_step, self.rows.len());
        let row = &self.rows[r];
        let c = bucket(p.lon - self.bbox.min.lon, row.lon_step, row.cols as usize);
        Some(CellId(row.first + c as u32))
    }

    /// Look up a cell by id.
    #[inline]
    pub fn cell(&self, id: CellId) -> Option<&GridCell> {
        self.cells.get(id.index())
    }

    /// All cells in id order.
    #[inline]
    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn cell_size_m(&self) -> f64 {
        self.cell_size_m
    }

    pub fn bbox(&self) -> BoundingBox {
        self.bbox
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Number of `step`-sized spans needed to cover `extent` (at least one).
#[inline]
fn span_count(extent: f64, step: f64) -> usize {
    ((extent / step).ceil() as usize).max(1)
}

/// Index of the span containing `offset`, clamped so the closed outer edge
/// lands in the last span.
#[inline]
fn bucket(offset: f64, step: f64, count: usize) -> usize {
    ((offset / step).floor() as usize).min(count - 1)
}

fn cell_id(n: usize) -> SpatialResult<CellId> {
    CellId::try_from(n)
        .ok()
        .filter(|id| *id != CellId::INVALID)
        .ok_or_else(|| SpatialError::InvalidGrid(format!("too many cells ({n})")))
}
