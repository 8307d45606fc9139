//! Reference road graph and builder.
//!
//! The engine only talks to the [`RoadGraph`](crate::RoadGraph) trait; graph
//! construction from map data is somebody else's job.  `RoadNetwork` is the
//! in-tree implementation used by the demo and the tests: a length-weighted
//! walk network loaded from CSV or built by hand.
//!
//! # Data layout
//!
//! Forward adjacency in CSR form: the edges leaving node `n` are
//! `first_out[n] .. first_out[n + 1]` in the parallel `heads` / `lengths_m`
//! arrays, so relaxing a node is one contiguous scan.  Nearest-node lookup
//! goes through an `rstar` R-tree over `[lat, lon × cos(lat₀)]`, where
//! `lat₀` is the mean node latitude: an equirectangular projection, so
//! distances along both axes are in the same units at city scale.

use rstar::RTree;
use rstar::primitives::GeomWithData;

use gc_core::{GeoPoint, NodeId};

/// R-tree entry: projected `[lat, lon × lon_scale]` tagged with its node.
type NodeEntry = GeomWithData<[f64; 2], NodeId>;

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Directed, length-weighted road graph plus a nearest-node index.
///
/// Built once by [`RoadNetworkBuilder`] and never mutated, so one instance
/// can back every concurrent computation.
#[derive(Debug)]
pub struct RoadNetwork {
    positions: Vec<GeoPoint>,
    /// Length `node_count + 1`.
    first_out: Vec<u32>,
    heads:     Vec<NodeId>,
    lengths_m: Vec<f64>,
    /// `cos` of the mean node latitude.
    lon_scale: f64,
    index:     RTree<NodeEntry>,
}

impl RoadNetwork {
    pub fn node_count(&self) -> usize {
        self.positions.len()
    }

    /// Directed edges; a two-way road counts twice.
    pub fn edge_count(&self) -> usize {
        self.heads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn position(&self, node: NodeId) -> Option<GeoPoint> {
        self.positions.get(node.index()).copied()
    }

    /// `(head, length_m)` for each edge leaving `node`.  Empty for an
    /// unknown node.
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        let span = match (self.first_out.get(node.index()), self.first_out.get(node.index() + 1)) {
            (Some(&lo), Some(&hi)) => lo as usize..hi as usize,
            _ => 0..0,
        };
        self.heads[span.clone()].iter().copied().zip(self.lengths_m[span].iter().copied())
    }

    /// Node nearest to `pos` in the projected plane, or `None` if the
    /// network has no nodes.
    pub fn nearest_node(&self, pos: GeoPoint) -> Option<NodeId> {
        self.index.nearest_neighbor(&project(pos, self.lon_scale)).map(|e| e.data)
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Collects nodes and edges, then freezes them with [`build`](Self::build).
///
/// ```
/// use gc_core::GeoPoint;
/// use gc_spatial::RoadNetworkBuilder;
///
/// let mut b = RoadNetworkBuilder::new();
/// let a = b.add_node(GeoPoint::new(41.390, 2.170));
/// let c = b.add_node(GeoPoint::new(41.392, 2.171));
/// b.add_road(a, c, 240.0);
/// let net = b.build();
/// assert_eq!(net.edge_count(), 2);
/// ```
#[derive(Default)]
pub struct RoadNetworkBuilder {
    positions: Vec<GeoPoint>,
    /// `(tail, head, length_m)`
    edges:     Vec<(NodeId, NodeId, f64)>,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self { positions: Vec::with_capacity(nodes), edges: Vec::with_capacity(edges) }
    }

    /// Add a node; ids are handed out densely from 0.
    pub fn add_node(&mut self, pos: GeoPoint) -> NodeId {
        self.positions.push(pos);
        NodeId((self.positions.len() - 1) as u32)
    }

    /// One-way edge.  Both endpoints must already have been added.
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId, length_m: f64) {
        debug_assert!(from.index() < self.positions.len() && to.index() < self.positions.len());
        self.edges.push((from, to, length_m));
    }

    /// Two-way edge of the same length in both directions.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, length_m: f64) {
        self.add_directed_edge(a, b, length_m);
        self.add_directed_edge(b, a, length_m);
    }

    pub fn position(&self, node: NodeId) -> Option<GeoPoint> {
        self.positions.get(node.index()).copied()
    }

    pub fn node_count(&self) -> usize {
        self.positions.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Freeze into a [`RoadNetwork`]: counting sort of edges by tail, then
    /// R-tree bulk load.
    pub fn build(self) -> RoadNetwork {
        let n = self.positions.len();

        let mut first_out = vec![0u32; n + 1];
        for &(tail, _, _) in &self.edges {
            first_out[tail.index() + 1] += 1;
        }
        for i in 0..n {
            first_out[i + 1] += first_out[i];
        }

        let mut cursor: Vec<u32> = first_out[..n].to_vec();
        let mut heads     = vec![NodeId::INVALID; self.edges.len()];
        let mut lengths_m = vec![0.0; self.edges.len()];
        for (tail, head, len) in self.edges {
            let slot = &mut cursor[tail.index()];
            heads[*slot as usize] = head;
            lengths_m[*slot as usize] = len;
            *slot += 1;
        }

        let lon_scale = if n == 0 {
            1.0
        } else {
            let mean_lat = self.positions.iter().map(|p| p.lat).sum::<f64>() / n as f64;
            mean_lat.to_radians().cos().max(f64::EPSILON)
        };
        let entries: Vec<NodeEntry> = self
            .positions
            .iter()
            .enumerate()
            .map(|(i, &p)| GeomWithData::new(project(p, lon_scale), NodeId(i as u32)))
            .collect();

        RoadNetwork {
            positions: self.positions,
            first_out,
            heads,
            lengths_m,
            lon_scale,
            index: RTree::bulk_load(entries),
        }
    }
}

#[inline]
fn project(p: GeoPoint, lon_scale: f64) -> [f64; 2] {
    [p.lat, p.lon * lon_scale]
}
