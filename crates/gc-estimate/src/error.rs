use std::path::PathBuf;

use gc_huff::ModelError;
use gc_io::DataError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EstimateError {
    #[error("cannot read config {}: {source}", path.display())]
    ConfigIo { path: PathBuf, source: std::io::Error },

    #[error("cannot parse config {}: {source}", path.display())]
    ConfigParse { path: PathBuf, source: serde_yaml::Error },

    #[error("invalid config: {0}")]
    Config(String),

    /// A demand or competitor dataset could not be loaded.
    #[error("{}: {source}", path.display())]
    Input { path: PathBuf, source: DataError },

    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type EstimateResult<T> = Result<T, EstimateError>;
