//! `gc-core` — foundational types for the geocompetition workspace.
//!
//! This crate is a dependency of every other `gc-*` crate.  It has no `gc-*`
//! dependencies and a single required external one (`thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`ids`]     | `CellId`, `NodeId`                                        |
//! | [`geo`]     | `GeoPoint`, haversine distance                            |
//! | [`point`]   | `WeightedPoint`, `AggregateRecord`                        |
//! | [`error`]   | `GcError`, `GcResult`                                     |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod point;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{GcError, GcResult};
pub use geo::GeoPoint;
pub use ids::{CellId, NodeId};
pub use point::{AggregateRecord, WeightedPoint};
