//! Folding per-competitor results into one value per demand group.
//!
//! Competitors reach different subsets of groups, so their vectors differ
//! in length and order.  Aggregation never lines them up positionally:
//!
//! 1. Take the union of every group id any competitor reaches, sorted by
//!    `CellId`.  This is the shared column order.
//! 2. Expand each competitor into a dense row over that order, 0 where the
//!    competitor does not reach the group.
//! 3. Average the rows (mean share) or, in joint mode, sum raw attractions
//!    and normalize once.
//! 4. Drop groups that end at 0 and rows without finite coordinates.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;

use gc_core::{AggregateRecord, CellId, GeoPoint};

use crate::{AggregationMode, Attraction, DemandGroup, ProbabilityVector};

/// Cross-competitor aggregation in the configured [`AggregationMode`].
#[derive(Copy, Clone, Debug, Default)]
pub struct ResultAggregator {
    mode: AggregationMode,
}

impl ResultAggregator {
    pub fn new(mode: AggregationMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> AggregationMode {
        self.mode
    }

    /// Aggregate one computation's attractions into output records, in
    /// `CellId` order.
    pub fn aggregate(&self, groups: &[DemandGroup], attractions: &[Attraction]) -> Vec<AggregateRecord> {
        let shares = match self.mode {
            AggregationMode::MeanShare => {
                let vectors: Vec<ProbabilityVector> =
                    attractions.iter().map(Attraction::normalize).collect();
                Self::mean_share(&vectors)
            }
            AggregationMode::JointShare => Self::joint_share(attractions),
        };
        Self::to_records(groups, &shares)
    }

    /// Mean of the zero-padded vectors over *all* competitors, including
    /// those whose vector is empty.
    pub fn mean_share(vectors: &[ProbabilityVector]) -> Vec<(CellId, f64)> {
        if vectors.is_empty() {
            return Vec::new();
        }
        let ids = union_ids(vectors.iter().flat_map(|v| v.iter().map(|(c, _)| c)));

        let mut sum = vec![0.0; ids.len()];
        for v in vectors {
            for (acc, p) in sum.iter_mut().zip(padded(v.entries(), &ids)) {
                *acc += p;
            }
        }

        let n = vectors.len() as f64;
        ids.into_iter().zip(sum).map(|(c, s)| (c, s / n)).collect()
    }

    /// Raw attractions summed per group, normalized once over the union.
    pub fn joint_share(attractions: &[Attraction]) -> Vec<(CellId, f64)> {
        let ids = union_ids(attractions.iter().flat_map(|a| a.entries().iter().map(|&(c, _)| c)));

        let mut sum = vec![0.0; ids.len()];
        for a in attractions {
            for (acc, raw) in sum.iter_mut().zip(padded(a.entries(), &ids)) {
                *acc += raw;
            }
        }

        let total: f64 = sum.iter().sum();
        if total <= 0.0 || !total.is_finite() {
            return Vec::new();
        }
        ids.into_iter().zip(sum).map(|(c, s)| (c, s / total)).collect()
    }

    /// Attach group centers to shares, dropping zero shares, groups not in
    /// `groups`, and non-finite coordinates.
    pub fn to_records(groups: &[DemandGroup], shares: &[(CellId, f64)]) -> Vec<AggregateRecord> {
        let centers: FxHashMap<CellId, GeoPoint> =
            groups.iter().map(|g| (g.cell, g.center)).collect();

        shares
            .iter()
            .filter(|&&(_, p)| p != 0.0 && p.is_finite())
            .filter_map(|&(cell, p)| {
                let center = centers.get(&cell)?;
                center.is_finite().then(|| AggregateRecord::new(*center, p))
            })
            .collect()
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn union_ids(ids: impl Iterator<Item = CellId>) -> Vec<CellId> {
    ids.collect::<BTreeSet<_>>().into_iter().collect()
}

/// Dense row over `ids` (sorted): the entry's value where present, else 0.
fn padded(entries: &[(CellId, f64)], ids: &[CellId]) -> Vec<f64> {
    let mut row = vec![0.0; ids.len()];
    for &(cell, value) in entries {
        if let Ok(i) = ids.binary_search(&cell) {
            row[i] += value;
        }
    }
    row
}
