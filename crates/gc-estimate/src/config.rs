//! YAML run configuration.
//!
//! ```yaml
//! area: Gràcia
//! customers: customers.csv
//! network:
//!   nodes: nodes.csv
//!   edges: edges.csv
//! competitors:
//!   bakeries:
//!     path: bakeries.csv
//!     distanceDecay: 1.5
//!   pharmacies:
//!     path: pharmacies.json
//! cacheDir: data          # default "data"
//! cellSize: 500           # metres, default 500
//! walkingSpeed: 6         # default 6
//! aggregation: mean       # "mean" or "joint", default "mean"
//! bounds:                 # optional; default encloses all points
//!   minLat: 41.38
//!   minLon: 2.13
//!   maxLat: 41.42
//!   maxLon: 2.18
//! ```
//!
//! Relative paths are resolved against the directory holding the file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use gc_core::GeoPoint;
use gc_huff::{AggregationMode, ModelConfig};
use gc_spatial::BoundingBox;

use crate::{EstimateError, EstimateResult};

fn default_cache_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_decay() -> f64 {
    ModelConfig::default().distance_decay
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EstimateConfig {
    /// Display name of the study area.
    #[serde(default)]
    pub area:          String,
    /// Demand dataset (customers).
    pub customers:     PathBuf,
    pub network:       NetworkFiles,
    /// Competitor datasets by key.  The key names the cache entry.
    pub competitors:   BTreeMap<String, CompetitorDataset>,
    #[serde(default = "default_cache_dir")]
    pub cache_dir:     PathBuf,
    #[serde(default)]
    pub cell_size:     Option<f64>,
    #[serde(default)]
    pub walking_speed: Option<f64>,
    #[serde(default)]
    pub aggregation:   Option<String>,
    #[serde(default)]
    pub bounds:        Option<Bounds>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkFiles {
    pub nodes: PathBuf,
    pub edges: PathBuf,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompetitorDataset {
    pub path:           PathBuf,
    #[serde(default = "default_decay")]
    pub distance_decay: f64,
}

#[derive(Copy, Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Bounds {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl EstimateConfig {
    /// Read, parse and validate a config file, resolving relative paths
    /// against its directory.
    pub fn load(path: &Path) -> EstimateResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| EstimateError::ConfigIo { path: path.to_path_buf(), source })?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Self::from_yaml_str(&text, base).map_err(|e| match e {
            EstimateError::ConfigParse { source, .. } => {
                EstimateError::ConfigParse { path: path.to_path_buf(), source }
            }
            other => other,
        })
    }

    /// Parse and validate YAML text; relative paths are joined onto `base`.
    pub fn from_yaml_str(text: &str, base: &Path) -> EstimateResult<Self> {
        let mut cfg: Self = serde_yaml::from_str(text)
            .map_err(|source| EstimateError::ConfigParse { path: PathBuf::new(), source })?;
        cfg.resolve_paths(base);
        cfg.model_config()?;
        Ok(cfg)
    }

    /// Engine parameters shared by every dataset.  Each dataset's decay is
    /// applied on top with [`ModelConfig::with_decay`].
    pub fn model_config(&self) -> EstimateResult<ModelConfig> {
        let defaults = ModelConfig::default();
        let aggregation = match &self.aggregation {
            Some(s) => s.parse::<AggregationMode>()?,
            None => defaults.aggregation,
        };
        let bounds = self.bounds.map(|b| b.to_bbox()).transpose()?;

        let config = ModelConfig {
            cell_size_m: self.cell_size.unwrap_or(defaults.cell_size_m),
            walking_speed: self.walking_speed.unwrap_or(defaults.walking_speed),
            aggregation,
            bounds,
            ..defaults
        };
        config.validate()?;

        for (key, ds) in &self.competitors {
            config.clone().with_decay(ds.distance_decay).validate().map_err(|e| {
                EstimateError::Config(format!("competitor dataset {key:?}: {e}"))
            })?;
        }
        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.customers);
        resolve(&mut self.network.nodes);
        resolve(&mut self.network.edges);
        resolve(&mut self.cache_dir);
        for ds in self.competitors.values_mut() {
            resolve(&mut ds.path);
        }
    }
}

impl Bounds {
    fn to_bbox(self) -> EstimateResult<BoundingBox> {
        let (min, max) = (GeoPoint::new(self.min_lat, self.min_lon), GeoPoint::new(self.max_lat, self.max_lon));
        if !min.is_finite() || !max.is_finite() || min.lat > max.lat || min.lon > max.lon {
            return Err(EstimateError::Config(format!("invalid bounds {min} .. {max}")));
        }
        Ok(BoundingBox::new(min, max))
    }
}
