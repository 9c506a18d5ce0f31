//! Error taxonomy for territory processing.
//!
//! Fallbacks (unknown algorithm name, degenerate density/spectral input) are
//! not errors: they are logged via `tracing::warn!` and recorded on the result.

use thiserror::Error;

/// Errors surfaced by `process` and the graph builders.
#[derive(Debug, Error)]
pub enum TerritoryError {
    /// Caller input is unusable (employee count, polygon shape, config).
    #[error("validation failed: {reason}")]
    Validation { reason: String },
    /// The street-network source has nothing usable for the boundary.
    #[error("street data unavailable: {reason}")]
    DataUnavailable { reason: String },
    /// A strategy returned a partition that does not cover every node exactly once.
    #[error("internal invariant violated: {reason}")]
    InternalInvariant { reason: String },
}

impl TerritoryError {
    pub(crate) fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    pub(crate) fn unavailable(reason: impl Into<String>) -> Self {
        Self::DataUnavailable {
            reason: reason.into(),
        }
    }

    pub(crate) fn invariant(reason: impl Into<String>) -> Self {
        Self::InternalInvariant {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TerritoryError>;
