//! Render surface hooks.
//!
//! The replay core never draws. It tells a [`RenderSurface`] which entities
//! appeared, changed or went away, and the surface reads the new state from
//! the entity (usually through [`Entity::appearance`]).

use netanim_entity::{Entity, EntityId};

/// Receives change notifications from the registry and the replay engine.
///
/// Every method defaults to a no-op so a surface only implements what it
/// draws.
pub trait RenderSurface {
    /// An entity was created and should be attached to the scene.
    fn entity_added(&mut self, _entity: &Entity) {}

    /// An entity's display attributes were replaced by replay.
    fn entity_updated(&mut self, _entity: &Entity) {}

    /// An entity's route highlighting changed.
    fn route_changed(&mut self, _entity: &Entity) {}

    /// An entity was destroyed and must be detached from the scene.
    fn entity_removed(&mut self, _id: EntityId) {}
}

/// A surface that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSurface;

impl RenderSurface for NullSurface {}

#[cfg(test)]
pub(crate) mod recording {
    use super::*;

    /// Records every notification, in order, for assertions.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingSurface {
        pub added: Vec<EntityId>,
        pub updated: Vec<(EntityId, String)>,
        pub routes: Vec<EntityId>,
        pub removed: Vec<EntityId>,
    }

    impl RenderSurface for RecordingSurface {
        fn entity_added(&mut self, entity: &Entity) {
            self.added.push(entity.id());
        }

        fn entity_updated(&mut self, entity: &Entity) {
            self.updated.push((entity.id(), entity.label().to_owned()));
        }

        fn route_changed(&mut self, entity: &Entity) {
            self.routes.push(entity.id());
        }

        fn entity_removed(&mut self, id: EntityId) {
            self.removed.push(id);
        }
    }
}
