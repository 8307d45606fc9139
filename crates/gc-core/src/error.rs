//! Workspace base error type.
//!
//! Sub-crates define their own error enums; loaders report a `GcError` as
//! a malformed record together with its index.

use thiserror::Error;

/// The error type for `gc-core` value construction.
#[derive(Debug, Error)]
pub enum GcError {
    #[error("invalid point: {0}")]
    InvalidPoint(String),
}

/// Shorthand result type for `gc-core`.
pub type GcResult<T> = Result<T, GcError>;
