//! Cached, per-dataset estimation and the multi-dataset runner.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use gc_core::{AggregateRecord, WeightedPoint};
use gc_huff::{MarketShareEngine, ModelConfig, RunStats};
use gc_io::ResultCache;
use gc_spatial::RoadGraph;

use crate::{CompetitorDataset, EstimateConfig, EstimateError, EstimateResult};

/// Result for one competitor dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct Estimate {
    pub records: Vec<AggregateRecord>,
    /// `None` when the records came from the cache.
    pub stats:   Option<RunStats>,
}

impl Estimate {
    pub fn from_cache(&self) -> bool {
        self.stats.is_none()
    }
}

/// One entry of [`Estimator::estimate_all`]: a dataset key and its own
/// result.  A failing dataset never affects its siblings.
#[derive(Debug)]
pub struct DatasetOutcome {
    pub key:    String,
    pub result: EstimateResult<Estimate>,
}

/// Runs [`MarketShareEngine`] computations for competitor datasets against
/// one demand dataset and one shared road graph, consulting a
/// [`ResultCache`] first.
pub struct Estimator<'g, G: RoadGraph + ?Sized> {
    graph:  &'g G,
    config: ModelConfig,
    cache:  ResultCache,
}

impl<'g, G: RoadGraph + ?Sized> Estimator<'g, G> {
    pub fn new(graph: &'g G, config: ModelConfig, cache: ResultCache) -> Self {
        Self { graph, config, cache }
    }

    /// Engine parameters and cache directory taken from `cfg`.
    pub fn from_config(graph: &'g G, cfg: &EstimateConfig) -> EstimateResult<Self> {
        Ok(Self::new(graph, cfg.model_config()?, ResultCache::new(&cfg.cache_dir)))
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Estimate one competitor dataset with decay exponent `decay`.
    ///
    /// With `use_cache`, a stored result for `key` is returned as-is.
    /// Every computed result is written back, so bypassing the cache also
    /// refreshes a stale entry.  A failed cache write is logged; the
    /// computed result is still returned.
    pub fn estimate(
        &self,
        key:         &str,
        demand:      &[WeightedPoint],
        competitors: &[WeightedPoint],
        decay:       f64,
        use_cache:   bool,
    ) -> EstimateResult<Estimate> {
        if let Some(hit) = self.cached(key, use_cache) {
            return Ok(hit);
        }
        self.compute(key, demand, competitors, decay)
    }

    /// Load `dataset` from disk and estimate it with its own decay exponent.
    /// On a cache hit the dataset file is not read.
    pub fn estimate_dataset(
        &self,
        key:       &str,
        dataset:   &CompetitorDataset,
        demand:    &[WeightedPoint],
        use_cache: bool,
    ) -> EstimateResult<Estimate> {
        if let Some(hit) = self.cached(key, use_cache) {
            return Ok(hit);
        }
        let competitors = load_input(&dataset.path)?;
        self.compute(key, demand, &competitors, dataset.distance_decay)
    }

    /// Estimate every dataset, one task per dataset, and return the outcomes
    /// in key order once all have finished.
    pub fn estimate_all(
        &self,
        datasets:  &BTreeMap<String, CompetitorDataset>,
        demand:    &[WeightedPoint],
        use_cache: bool,
    ) -> Vec<DatasetOutcome> {
        let run = |(key, dataset): (&String, &CompetitorDataset)| {
            let result = self.estimate_dataset(key, dataset, demand, use_cache);
            if let Err(e) = &result {
                log::error!("{key}: {e}");
            }
            DatasetOutcome { key: key.clone(), result }
        };

        #[cfg(not(feature = "parallel"))]
        {
            datasets.iter().map(run).collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            datasets.par_iter().map(run).collect()
        }
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    fn cached(&self, key: &str, use_cache: bool) -> Option<Estimate> {
        if !use_cache {
            return None;
        }
        let records = self.cache.load(key)?;
        log::info!("{key}: {} records from cache", records.len());
        Some(Estimate { records, stats: None })
    }

    fn compute(
        &self,
        key:         &str,
        demand:      &[WeightedPoint],
        competitors: &[WeightedPoint],
        decay:       f64,
    ) -> EstimateResult<Estimate> {
        let start = Instant::now();
        let engine = MarketShareEngine::new(self.graph, self.config.clone().with_decay(decay))?;
        let share = engine.compute(demand, competitors)?;
        log::info!(
            "{key}: {} records, {} competitors, {} distance queries in {:.2?}",
            share.records.len(),
            share.stats.competitors,
            share.stats.distance_queries,
            start.elapsed()
        );

        if let Err(e) = self.cache.save(key, &share.records) {
            log::warn!("{key}: cannot write cache entry: {e}");
        }
        Ok(Estimate { records: share.records, stats: Some(share.stats) })
    }
}

/// Load the demand dataset named by `cfg`.
pub fn load_demand(cfg: &EstimateConfig) -> EstimateResult<Vec<WeightedPoint>> {
    load_input(&cfg.customers)
}

fn load_input(path: &Path) -> EstimateResult<Vec<WeightedPoint>> {
    gc_io::load_points(path).map_err(|source| EstimateError::Input { path: path.to_path_buf(), source })
}
