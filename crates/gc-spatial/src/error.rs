//! Spatial-subsystem error type.

use thiserror::Error;

/// Errors produced by `gc-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    /// The road graph has no vertices, so nothing can be located.  Fatal for
    /// the whole computation and never retried.
    #[error("configuration error: road graph has no vertices")]
    EmptyGraph,

    #[error("invalid grid: {0}")]
    InvalidGrid(String),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
