//! The road-graph seam and the default length-weighted Dijkstra.
//!
//! # Pluggability
//!
//! The engine reaches the graph only through [`RoadGraph`], so any graph
//! service that can answer "nearest vertex to this coordinate" and "length of
//! the shortest path between two vertices" can be plugged in.  The in-tree
//! [`RoadNetwork`] implements it with an R-tree and Dijkstra.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use gc_core::{GeoPoint, NodeId};

use crate::network::RoadNetwork;

// ── RoadGraph trait ───────────────────────────────────────────────────────────

/// Read-only road graph consumed by the engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync`: one graph is shared by every
/// per-dataset computation running on the Rayon pool, and must not change
/// while they run.
pub trait RoadGraph: Send + Sync {
    /// Number of vertices.  Zero means nothing can be located.
    fn vertex_count(&self) -> usize;

    /// Vertex closest to `pos`, or `None` if the graph is empty.
    fn nearest_vertex(&self, pos: GeoPoint) -> Option<NodeId>;

    /// Length in metres of the shortest path `from → to`, or `None` if no
    /// path exists.  `from == to` is a zero-length path.
    fn shortest_path_length(&self, from: NodeId, to: NodeId) -> Option<f64>;
}

impl RoadGraph for RoadNetwork {
    fn vertex_count(&self) -> usize {
        self.node_count()
    }

    fn nearest_vertex(&self, pos: GeoPoint) -> Option<NodeId> {
        self.nearest_node(pos)
    }

    fn shortest_path_length(&self, from: NodeId, to: NodeId) -> Option<f64> {
        dijkstra_length(self, from, to)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Heap entry ordered so that `BinaryHeap` (a max-heap) pops the smallest
/// cost first.  Ties break on `NodeId` for determinism.
#[derive(Copy, Clone, PartialEq)]
struct Frontier {
    cost: f64,
    node: NodeId,
}

impl Eq for Frontier {}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn dijkstra_length(network: &RoadNetwork, from: NodeId, to: NodeId) -> Option<f64> {
    let n = network.node_count();
    if from.index() >= n || to.index() >= n {
        return None;
    }
    if from == to {
        return Some(0.0);
    }

    // dist[v] = best known length (m) to reach v.
    let mut dist = vec![f64::INFINITY; n];
    dist[from.index()] = 0.0;

    let mut heap = BinaryHeap::new();
    heap.push(Frontier { cost: 0.0, node: from });

    while let Some(Frontier { cost, node }) = heap.pop() {
        if node == to {
            return Some(cost);
        }

        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }

        for (neighbor, length_m) in network.neighbors(node) {
            let next = cost + length_m;

            if next < dist[neighbor.index()] {
                dist[neighbor.index()] = next;
                heap.push(Frontier { cost: next, node: neighbor });
            }
        }
    }

    None
}
