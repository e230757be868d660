//! Timestamped update events.

use netanim_entity::{EntityId, UpdatePayload};
use serde::{Deserialize, Serialize};

/// An instruction to replace one entity's display attributes at a given
/// simulated time. Events are immutable once ingested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateEvent {
    /// The entity this event mutates.
    pub target: EntityId,
    /// Simulated time in seconds.
    pub time: f64,
    pub payload: UpdatePayload,
}

impl UpdateEvent {
    #[must_use]
    pub fn new(target: impl Into<EntityId>, time: f64, payload: UpdatePayload) -> Self {
        Self {
            target: target.into(),
            time,
            payload,
        }
    }
}
