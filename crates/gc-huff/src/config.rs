//! Engine parameters.

use std::fmt;
use std::str::FromStr;

use gc_spatial::BoundingBox;

use crate::{ModelError, ModelResult};

/// How per-competitor results are folded into one value per demand group.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum AggregationMode {
    /// Arithmetic mean of each competitor's normalized probability vector,
    /// absent groups counting as 0.  Not renormalized, so the output need not
    /// sum to 1.
    #[default]
    MeanShare,
    /// Raw attractions summed per group across all competitors, then
    /// normalized once over the union.  Sums to 1.
    JointShare,
}

impl FromStr for AggregationMode {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mean" | "mean-share" | "mean_share" => Ok(AggregationMode::MeanShare),
            "joint" | "joint-share" | "joint_share" => Ok(AggregationMode::JointShare),
            other => Err(ModelError::Config(format!(
                "unknown aggregation mode {other:?}: expected \"mean\" or \"joint\""
            ))),
        }
    }
}

impl fmt::Display for AggregationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AggregationMode::MeanShare  => "mean",
            AggregationMode::JointShare => "joint",
        })
    }
}

/// Parameters of one computation.
///
/// | Field            | Default | Unit                          |
/// |------------------|---------|-------------------------------|
/// | `cell_size_m`    | 500     | metres                        |
/// | `walking_speed`  | 6       | metres per travel-time unit   |
/// | `distance_decay` | 1.5     | exponent on travel time       |
/// | `aggregation`    | mean    |                               |
/// | `bounds`         | `None`  | derived from the input points |
#[derive(Clone, Debug, PartialEq)]
pub struct ModelConfig {
    pub cell_size_m:    f64,
    pub walking_speed:  f64,
    pub distance_decay: f64,
    pub aggregation:    AggregationMode,
    /// Grid extent.  `None` uses the box enclosing all demand and competitor
    /// points.
    pub bounds:         Option<BoundingBox>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            cell_size_m:    500.0,
            walking_speed:  6.0,
            distance_decay: 1.5,
            aggregation:    AggregationMode::MeanShare,
            bounds:         None,
        }
    }
}

impl ModelConfig {
    /// Same config with a different decay exponent (decay is chosen per
    /// competitor dataset).
    pub fn with_decay(mut self, distance_decay: f64) -> Self {
        self.distance_decay = distance_decay;
        self
    }

    pub fn validate(&self) -> ModelResult<()> {
        if !self.cell_size_m.is_finite() || self.cell_size_m <= 0.0 {
            return Err(ModelError::Config(format!(
                "cell size must be positive, got {}",
                self.cell_size_m
            )));
        }
        if !self.walking_speed.is_finite() || self.walking_speed <= 0.0 {
            return Err(ModelError::Config(format!(
                "walking speed must be positive, got {}",
                self.walking_speed
            )));
        }
        if !self.distance_decay.is_finite() {
            return Err(ModelError::Config(format!(
                "distance decay must be finite, got {}",
                self.distance_decay
            )));
        }
        Ok(())
    }
}
