//! Shortest-path distances memoized per unordered vertex pair.
//!
//! The engine asks for one distance per (competitor × demand group) and
//! competitors routinely share demand-group vertices, so each unordered pair
//! is computed at most once per run.  The key is `(min, max)` and the graph
//! is always queried in that canonical order, which makes `(a, b)` and
//! `(b, a)` share one slot and one value even on a directed graph.

use rustc_hash::FxHashMap;

use gc_core::NodeId;

use crate::RoadGraph;

/// Result of a distance query.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Distance {
    /// Shortest-path length in metres.
    Metres(f64),
    /// No path exists between the two vertices.
    Unreachable,
}

impl Distance {
    /// Length in metres, or `None` if unreachable.
    #[inline]
    pub fn metres(self) -> Option<f64> {
        match self {
            Distance::Metres(m) => Some(m),
            Distance::Unreachable => None,
        }
    }

    #[inline]
    pub fn is_reachable(self) -> bool {
        matches!(self, Distance::Metres(_))
    }
}

impl From<Option<f64>> for Distance {
    fn from(length: Option<f64>) -> Self {
        length.map_or(Distance::Unreachable, Distance::Metres)
    }
}

/// Per-run distance cache in front of a [`RoadGraph`].
///
/// `Unreachable` results are cached too, so a disconnected pair costs one
/// traversal, not one per competitor.
pub struct DistanceOracle<'g, G: RoadGraph + ?Sized> {
    graph:  &'g G,
    cache:  FxHashMap<(NodeId, NodeId), Distance>,
    hits:   usize,
    misses: usize,
}

impl<'g, G: RoadGraph + ?Sized> DistanceOracle<'g, G> {
    pub fn new(graph: &'g G) -> Self {
        Self { graph, cache: FxHashMap::default(), hits: 0, misses: 0 }
    }

    /// Distance between `a` and `b`, order-independent.
    pub fn distance(&mut self, a: NodeId, b: NodeId) -> Distance {
        let key = pair_key(a, b);
        if let Some(&d) = self.cache.get(&key) {
            self.hits += 1;
            return d;
        }
        self.misses += 1;
        let d = Distance::from(self.graph.shortest_path_length(key.0, key.1));
        self.cache.insert(key, d);
        d
    }

    /// Lookups answered from the cache.
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Lookups that went to the graph (= distinct pairs seen).
    pub fn misses(&self) -> usize {
        self.misses
    }

    /// Number of cached pairs.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

#[inline]
fn pair_key(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
    if a <= b { (a, b) } else { (b, a) }
}
