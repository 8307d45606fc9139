use gc_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Spatial(#[from] SpatialError),
}

pub type ModelResult<T> = Result<T, ModelError>;
