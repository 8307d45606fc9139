//! Nearest-vertex lookup memoized per grid cell.

use rustc_hash::FxHashMap;

use gc_core::{CellId, GeoPoint, NodeId};

use crate::{RoadGraph, SpatialError, SpatialResult};

/// Resolves points to graph vertices, one representative vertex per cell.
///
/// Everything assigned to a cell (a demand group or any competitor inside it)
/// routes from the same vertex.  The first `locate` for a cell queries the
/// graph; later calls for that cell return the cached vertex even if a
/// different point is passed.
///
/// Owned by a single computation and dropped with it; concurrent
/// computations each hold their own locator.
pub struct NodeLocator<'g, G: RoadGraph + ?Sized> {
    graph:   &'g G,
    by_cell: FxHashMap<CellId, NodeId>,
    queries: usize,
}

impl<'g, G: RoadGraph + ?Sized> NodeLocator<'g, G> {
    pub fn new(graph: &'g G) -> Self {
        Self { graph, by_cell: FxHashMap::default(), queries: 0 }
    }

    /// Vertex for `cell`, querying the graph with `pos` on first use.
    ///
    /// # Errors
    ///
    /// [`SpatialError::EmptyGraph`] if the graph has no vertices.
    pub fn locate(&mut self, cell: CellId, pos: GeoPoint) -> SpatialResult<NodeId> {
        if let Some(&node) = self.by_cell.get(&cell) {
            return Ok(node);
        }
        self.queries += 1;
        let node = self
            .graph
            .nearest_vertex(pos)
            .ok_or(SpatialError::EmptyGraph)?;
        self.by_cell.insert(cell, node);
        Ok(node)
    }

    /// Number of cells resolved so far.
    pub fn len(&self) -> usize {
        self.by_cell.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_cell.is_empty()
    }

    /// Number of nearest-vertex queries issued to the graph.
    pub fn graph_queries(&self) -> usize {
        self.queries
    }
}
