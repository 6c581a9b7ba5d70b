use thiserror::Error;

pub type TspResult<T> = Result<T, TspError>;

#[derive(Debug, Error)]
pub enum TspError {
    /// Too few vertices for a tour to exist
    #[error("graph needs at least {minimum} vertices, got {n}")]
    InvalidSize { n: usize, minimum: usize },

    #[error("point {index} has a non-finite coordinate")]
    NonFiniteCoordinate { index: usize },

    /// Every vertex coincides, so there is no lower bound to compare against
    #[error("minimum spanning tree has zero weight, approximation ratio is undefined")]
    ZeroWeightTree,

    /// A pipeline stage produced output that breaks its post-conditions.
    ///
    /// This is a bug in tree construction or doubling, never a property of the input.
    #[error("internal invariant violated: {0}")]
    InvariantViolation(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
