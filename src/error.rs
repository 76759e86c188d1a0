use thiserror::Error;

/// Errors returned by the clustering engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// A distance metric was requested by a name this crate does not know.
    #[error("unsupported metric: {name:?}")]
    UnsupportedMetric {
        /// The name that failed to resolve.
        name: String,
    },

    /// Points are incompatible with the metric, or with each other.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimensionality.
        expected: usize,
        /// Found dimensionality.
        found: usize,
    },
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
