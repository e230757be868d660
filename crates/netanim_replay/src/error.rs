//! Replay-layer error types.

use netanim_entity::EntityId;

/// Errors returned by registry lookups that require an existing entity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// No entity has been registered under this id.
    #[error("unknown entity {0}")]
    UnknownEntity(EntityId),
}

/// Errors returned while ingesting update events.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReplayError {
    /// Event timestamps must be finite and non-negative.
    #[error("invalid update time {time}")]
    InvalidTime {
        /// The rejected timestamp.
        time: f64,
    },
}
