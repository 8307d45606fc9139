//! `gc-estimate` — configured runs over several competitor datasets.
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`config`]   | `EstimateConfig`: YAML run configuration                 |
//! | [`estimate`] | `Estimator`: cached per-dataset estimation, `estimate_all` |
//! | [`error`]    | `EstimateError`, `EstimateResult<T>`                      |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                   |
//! |------------|----------------------------------------------------------|
//! | `parallel` | `estimate_all` runs one Rayon task per dataset.          |

pub mod config;
pub mod error;
pub mod estimate;

#[cfg(test)]
mod tests;

pub use config::{Bounds, CompetitorDataset, EstimateConfig, NetworkFiles};
pub use error::{EstimateError, EstimateResult};
pub use estimate::{DatasetOutcome, Estimate, Estimator, load_demand};
