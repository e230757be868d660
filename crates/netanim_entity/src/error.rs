//! Entity-level error types.

/// Errors that can occur while mutating entity state.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EntityError {
    /// An energy source capacity fell outside the closed interval `[0, 1]`.
    #[error("residual capacity {capacity} is outside [0, 1]")]
    InvalidCapacity {
        /// The rejected capacity value.
        capacity: f64,
    },
}
