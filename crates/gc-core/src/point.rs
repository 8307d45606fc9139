//! Weighted input points and the aggregated output record.

use crate::{GcError, GcResult, GeoPoint};

/// A location with a non-negative weight.
///
/// For demand datasets the weight is a population count; for competitor
/// datasets it is the site's attractiveness (e.g. sales floor area).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeightedPoint {
    pub pos:    GeoPoint,
    pub weight: f64,
}

impl WeightedPoint {
    /// Validated constructor.
    ///
    /// # Errors
    ///
    /// [`GcError::InvalidPoint`] if a coordinate is not finite or the weight
    /// is negative or not finite.
    pub fn try_new(lat: f64, lon: f64, weight: f64) -> GcResult<Self> {
        let pos = GeoPoint::new(lat, lon);
        if !pos.is_finite() {
            return Err(GcError::InvalidPoint(format!("non-finite coordinate {pos}")));
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(GcError::InvalidPoint(format!("invalid weight {weight} at {pos}")));
        }
        Ok(Self { pos, weight })
    }
}

/// One output row: the probability attached to a demand group's location.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AggregateRecord {
    pub lat:         f64,
    pub lon:         f64,
    pub probability: f64,
}

impl AggregateRecord {
    #[inline]
    pub fn new(pos: GeoPoint, probability: f64) -> Self {
        Self { lat: pos.lat, lon: pos.lon, probability }
    }

    #[inline]
    pub fn pos(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }

    /// `(lat, lon, probability)`, the wire shape of the result.
    #[inline]
    pub fn as_tuple(&self) -> (f64, f64, f64) {
        (self.lat, self.lon, self.probability)
    }
}

impl From<(f64, f64, f64)> for AggregateRecord {
    fn from((lat, lon, probability): (f64, f64, f64)) -> Self {
        Self { lat, lon, probability }
    }
}
