//! One market-share computation, end to end.

use gc_core::{AggregateRecord, NodeId, WeightedPoint};
use gc_spatial::{BoundingBox, Distance, DistanceOracle, NodeLocator, RoadGraph, SpatialError, SpatialGrid};

use crate::{
    Attraction, AttractionModel, DemandGroup, ModelConfig, ModelResult, ResultAggregator,
    group_demand, place_competitors,
};

/// Counters collected during one computation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Grid cells built.
    pub cells:               usize,
    /// Demand groups routed (after dropping empty / out-of-grid ones).
    pub demand_groups:       usize,
    /// Competitors placed on the grid.
    pub competitors:         usize,
    /// Competitors that reached no demand group at all.
    pub empty_competitors:   usize,
    /// (competitor, group) pairs with no path.
    pub unreachable_pairs:   usize,
    /// Distinct vertex pairs sent to the graph.
    pub distance_queries:    usize,
    /// Distance lookups answered from the per-run cache.
    pub distance_cache_hits: usize,
    /// Nearest-vertex queries sent to the graph.
    pub vertex_queries:      usize,
}

/// Output of [`MarketShareEngine::compute`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MarketShare {
    /// One row per demand group reached by at least one competitor, in
    /// `CellId` order.
    pub records: Vec<AggregateRecord>,
    pub stats:   RunStats,
}

/// Runs the Huff model for one demand dataset against one competitor
/// dataset over a shared, read-only road graph.
///
/// Each [`compute`](Self::compute) call is self-contained: it builds its own
/// grid, [`NodeLocator`] and [`DistanceOracle`] and drops them on return, so
/// one engine (or many) can run on several threads against the same graph.
pub struct MarketShareEngine<'g, G: RoadGraph + ?Sized> {
    graph:  &'g G,
    config: ModelConfig,
}

impl<'g, G: RoadGraph + ?Sized> MarketShareEngine<'g, G> {
    /// # Errors
    ///
    /// [`ModelError::Config`](crate::ModelError::Config) if `config` is
    /// invalid.
    pub fn new(graph: &'g G, config: ModelConfig) -> ModelResult<Self> {
        config.validate()?;
        Ok(Self { graph, config })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Estimate every demand group's probability of visiting the
    /// competitors.
    ///
    /// # Errors
    ///
    /// - [`SpatialError::EmptyGraph`] if the graph has no vertices.
    /// - [`SpatialError::InvalidGrid`] if the grid cannot be built, including
    ///   one over [`MAX_CELLS`](gc_spatial::grid::MAX_CELLS) cells.
    ///
    /// Unreachable pairs, co-located points and competitors that reach
    /// nothing are handled in place and never surface as errors.
    pub fn compute(
        &self,
        demand:      &[WeightedPoint],
        competitors: &[WeightedPoint],
    ) -> ModelResult<MarketShare> {
        if self.graph.vertex_count() == 0 {
            return Err(SpatialError::EmptyGraph.into());
        }

        let bbox = self.config.bounds.or_else(|| {
            BoundingBox::enclosing(demand.iter().chain(competitors).map(|p| p.pos))
        });
        let Some(bbox) = bbox else {
            log::debug!("no input points; nothing to estimate");
            return Ok(MarketShare::default());
        };

        // ── Grid and grouping ─────────────────────────────────────────────
        let grid   = SpatialGrid::new(bbox, self.config.cell_size_m)?;
        let groups = group_demand(&grid, demand);
        let sites  = place_competitors(&grid, competitors);

        let mut stats = RunStats {
            cells:         grid.len(),
            demand_groups: groups.len(),
            competitors:   sites.len(),
            ..RunStats::default()
        };
        log::debug!(
            "{} demand points → {} groups; {} competitors placed",
            demand.len(),
            groups.len(),
            sites.len()
        );
        if groups.is_empty() || sites.is_empty() {
            return Ok(MarketShare { records: Vec::new(), stats });
        }

        // ── Per-competitor attraction ─────────────────────────────────────
        let model       = AttractionModel::from_config(&self.config);
        let mut locator = NodeLocator::new(self.graph);
        let mut oracle  = DistanceOracle::new(self.graph);

        let group_nodes: Vec<NodeId> = groups
            .iter()
            .map(|g| locator.locate(g.cell, g.center))
            .collect::<Result<_, _>>()?;

        let mut attractions: Vec<Attraction> = Vec::with_capacity(sites.len());
        let mut reach: Vec<(DemandGroup, Distance)> = Vec::with_capacity(groups.len());

        for site in &sites {
            let origin = locator.locate(site.cell, site.center)?;

            reach.clear();
            for (group, &node) in groups.iter().zip(&group_nodes) {
                let d = oracle.distance(origin, node);
                if !d.is_reachable() {
                    stats.unreachable_pairs += 1;
                }
                reach.push((*group, d));
            }

            let attraction = model.attraction(site.attractiveness, &reach);
            if attraction.normalize().is_empty() {
                stats.empty_competitors += 1;
            }
            attractions.push(attraction);
        }

        stats.distance_queries    = oracle.misses();
        stats.distance_cache_hits = oracle.hits();
        stats.vertex_queries      = locator.graph_queries();

        // ── Aggregate ─────────────────────────────────────────────────────
        let records = ResultAggregator::new(self.config.aggregation).aggregate(&groups, &attractions);

        log::debug!(
            "{} records; {} distance queries, {} cache hits, {} unreachable pairs",
            records.len(),
            stats.distance_queries,
            stats.distance_cache_hits,
            stats.unreachable_pairs
        );

        Ok(MarketShare { records, stats })
    }
}
