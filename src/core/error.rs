use thiserror::Error;

use super::ask_tell::State;

/// Error related to the definition of a search space or to points that do not
/// fit in it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoundsError {
    /// A dimension violates its invariants (bad range, transform or
    /// categories).
    #[error("invalid dimension \"{name}\": {reason}")]
    InvalidDimension {
        /// Name of the offending dimension.
        name: String,
        /// Human-readable description of the violation.
        reason: String,
    },
    /// No dimension was added to the bounds.
    #[error("bounds must contain at least one dimension")]
    EmptyBounds,
    /// The length of a point does not match the dimensionality of the bounds.
    #[error("point has {actual} coordinates but the bounds have {expected} dimensions")]
    DimensionMismatch {
        /// Dimensionality of the bounds.
        expected: usize,
        /// Length of the given point.
        actual: usize,
    },
    /// A native value does not belong to its dimension.
    #[error("invalid value for dimension \"{name}\": {reason}")]
    InvalidValue {
        /// Name of the dimension.
        name: String,
        /// Human-readable description of the problem.
        reason: String,
    },
}

/// Error returned from the ask-tell interface.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AskTellError {
    /// An operation was called out of turn.
    #[error("{operation} called while the optimizer is {state}")]
    ProtocolViolation {
        /// The operation that was called.
        operation: &'static str,
        /// The state the optimizer was in.
        state: State,
    },
    /// The observed point is not the pending suggestion.
    #[error("observed point does not match the pending suggestion")]
    PointMismatch,
    /// A configuration parameter is out of its valid range.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter {
        /// Name of the parameter.
        name: &'static str,
        /// Human-readable description of the problem.
        reason: String,
    },
    /// Error when converting between native and normalized points.
    #[error("{0}")]
    Bounds(#[from] BoundsError),
}
