//! Huff gravity model for a single competitor.
//!
//! For competitor attractiveness `A`, demand group weight `W` and network
//! distance `d`:
//!
//! ```text
//! t   = d / walking_speed          (t == 0 → 1, co-located points)
//! raw = A · W / t^decay
//! p   = raw / Σ raw                (over groups reachable from this site)
//! ```
//!
//! Unreachable groups are left out rather than zero-filled; padding against
//! other competitors happens in [`ResultAggregator`](crate::ResultAggregator).

use gc_core::CellId;
use gc_spatial::Distance;

use crate::{DemandGroup, ModelConfig};

// ── Attraction ────────────────────────────────────────────────────────────────

/// Un-normalized attraction of one competitor over the groups it reaches.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attraction {
    raw: Vec<(CellId, f64)>,
}

impl Attraction {
    pub fn entries(&self) -> &[(CellId, f64)] {
        &self.raw
    }

    pub fn total(&self) -> f64 {
        self.raw.iter().map(|&(_, a)| a).sum()
    }

    /// Divide by the total.  A zero or non-finite total yields an empty
    /// vector instead of a division by zero.
    pub fn normalize(&self) -> ProbabilityVector {
        let total = self.total();
        if total <= 0.0 || !total.is_finite() {
            return ProbabilityVector::default();
        }
        ProbabilityVector {
            entries: self.raw.iter().map(|&(cell, a)| (cell, a / total)).collect(),
        }
    }
}

// ── ProbabilityVector ─────────────────────────────────────────────────────────

/// One competitor's share of each demand group it reaches, in the order the
/// groups were offered.  Sums to 1, or is empty.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProbabilityVector {
    entries: Vec<(CellId, f64)>,
}

impl ProbabilityVector {
    /// Wrap precomputed entries as-is (no normalization or validation).
    pub fn from_entries(entries: Vec<(CellId, f64)>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[(CellId, f64)] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = (CellId, f64)> + '_ {
        self.entries.iter().copied()
    }

    /// Probability for `cell`, or `None` if this competitor does not reach it.
    pub fn get(&self, cell: CellId) -> Option<f64> {
        self.entries.iter().find(|(c, _)| *c == cell).map(|&(_, p)| p)
    }

    pub fn sum(&self) -> f64 {
        self.entries.iter().map(|&(_, p)| p).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ── AttractionModel ───────────────────────────────────────────────────────────

/// Distance-decay parameters of the gravity model.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AttractionModel {
    walking_speed:  f64,
    distance_decay: f64,
}

impl AttractionModel {
    pub fn new(walking_speed: f64, distance_decay: f64) -> Self {
        Self { walking_speed, distance_decay }
    }

    pub fn from_config(config: &ModelConfig) -> Self {
        Self::new(config.walking_speed, config.distance_decay)
    }

    /// Travel time for `distance_m`, with exactly zero floored to 1.
    #[inline]
    pub fn travel_time(&self, distance_m: f64) -> f64 {
        let t = distance_m / self.walking_speed;
        if t == 0.0 { 1.0 } else { t }
    }

    /// `A · W / t^decay` for one (competitor, group) pair.
    #[inline]
    pub fn raw(&self, attractiveness: f64, weight: f64, distance_m: f64) -> f64 {
        attractiveness * weight / self.travel_time(distance_m).powf(self.distance_decay)
    }

    /// Raw attraction of a competitor over every reachable group in `reach`.
    pub fn attraction(&self, attractiveness: f64, reach: &[(DemandGroup, Distance)]) -> Attraction {
        Attraction {
            raw: reach
                .iter()
                .filter_map(|(group, d)| {
                    let m = d.metres()?;
                    Some((group.cell, self.raw(attractiveness, group.weight, m)))
                })
                .collect(),
        }
    }

    /// Normalized share of a competitor over every reachable group in `reach`.
    pub fn probabilities(
        &self,
        attractiveness: f64,
        reach: &[(DemandGroup, Distance)],
    ) -> ProbabilityVector {
        self.attraction(attractiveness, reach).normalize()
    }
}
