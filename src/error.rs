//! Error types for subgraph sampling.

use thiserror::Error;

/// Errors surfaced by the sampling engine.
///
/// Nothing here is retryable: every variant is either a configuration defect
/// or a caller passing malformed input, and is propagated as-is.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SamplingError {
    /// Policy name that neither the built-in policies nor the strategy
    /// registry know about.
    #[error("unknown sampling policy '{0}'")]
    UnknownPolicy(String),

    /// Prune policy name other than the forest or node-collection modes.
    #[error("unsupported prune policy '{0}'")]
    UnsupportedPrunePolicy(String),

    /// Size boundaries do not cover the score matrix exactly.
    #[error("size boundaries sum to {expected} rows but scores have {actual} rows")]
    BoundaryMismatch { expected: usize, actual: usize },

    /// One size boundary per graph is required.
    #[error("batch has {graphs} graphs but {boundaries} size boundaries")]
    BoundaryCount { graphs: usize, boundaries: usize },

    /// Configuration values that cannot produce a mask.
    #[error("invalid sampler configuration: {0}")]
    InvalidConfig(String),

    /// Caller bug: ids out of range, score rows not matching the graph, etc.
    #[error("precondition violated: {0}")]
    Precondition(String),

    /// Failure reported by a registered external strategy.
    #[error("strategy '{name}' failed: {source}")]
    Strategy {
        name: String,
        #[source]
        source: anyhow::Error,
    },
}

impl SamplingError {
    /// Whether this error stems from the sampler configuration rather than
    /// from the data handed to a call.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SamplingError::UnknownPolicy(_)
                | SamplingError::UnsupportedPrunePolicy(_)
                | SamplingError::BoundaryMismatch { .. }
                | SamplingError::BoundaryCount { .. }
                | SamplingError::InvalidConfig(_)
        )
    }
}

pub type SamplingResult<T> = std::result::Result<T, SamplingError>;
