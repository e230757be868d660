//! Animation session: one loaded animation and everything it owns.
//!
//! A session holds exactly one [`EntityRegistry`], one [`ReplayEngine`] and
//! the [`RenderSurface`] they report to. Loading another animation means
//! resetting the session (or building a new one); there is no global state.

use netanim_entity::{Entity, EntityId, EntityParams};
use tracing::info;

use crate::error::{RegistryError, ReplayError};
use crate::event::UpdateEvent;
use crate::registry::EntityRegistry;
use crate::surface::{NullSurface, RenderSurface};
use crate::timeline::ReplayEngine;

/// The registry, replay engine and render surface of one animation.
#[derive(Debug, Default)]
pub struct AnimationSession<S: RenderSurface = NullSurface> {
    registry: EntityRegistry,
    engine: ReplayEngine,
    surface: S,
}

impl<S: RenderSurface> AnimationSession<S> {
    /// Create an empty session reporting to `surface`.
    #[must_use]
    pub fn new(surface: S) -> Self {
        Self {
            registry: EntityRegistry::new(),
            engine: ReplayEngine::new(),
            surface,
        }
    }

    /// Register an entity on first reference.
    ///
    /// Newly created entities are attached to the surface. Returns `true` if
    /// the entity was created by this call.
    pub fn register_entity(&mut self, id: EntityId, params: EntityParams) -> bool {
        let (entity, created) = self.registry.get_or_create(id, params);
        if created {
            self.surface.entity_added(entity);
        }
        created
    }

    /// Append an update event to the replay log.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::InvalidTime`] for negative or non-finite times.
    pub fn ingest(&mut self, event: UpdateEvent) -> Result<(), ReplayError> {
        self.engine.ingest(event)
    }

    /// Bring every entity to its state at `time`. Returns `true` if anything
    /// needs repainting.
    pub fn advance_to(&mut self, time: f64) -> bool {
        self.engine
            .advance_to(time, &mut self.registry, &mut self.surface)
    }

    /// Time of the next pending update, `None` if nothing remains.
    #[must_use]
    pub fn next_wake_time(&self) -> Option<f64> {
        self.engine.next_wake_time()
    }

    /// Set the route highlighting of one entity.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownEntity`] if `id` is not registered.
    pub fn mark_route(
        &mut self,
        id: EntityId,
        marked: bool,
        source: bool,
        destination: bool,
    ) -> Result<(), RegistryError> {
        let entity = self
            .registry
            .get_mut(id)
            .ok_or(RegistryError::UnknownEntity(id))?;
        entity.mark_on_route(marked, source, destination);
        self.surface.route_changed(entity);
        Ok(())
    }

    /// Remove route highlighting from every marked entity.
    pub fn clear_route_marks(&mut self) {
        let marked: Vec<EntityId> = self
            .registry
            .iter()
            .filter(|e| e.route().marked)
            .map(Entity::id)
            .collect();
        for id in marked {
            if let Some(entity) = self.registry.get_mut(id) {
                entity.mark_on_route(false, false, false);
                self.surface.route_changed(entity);
            }
        }
    }

    /// Drop all events and entities. The engine is reset before the
    /// registry so it never refers to destroyed entities.
    pub fn reset(&mut self) {
        info!("resetting animation session");
        self.engine.reset();
        self.registry.reset(&mut self.surface);
    }

    #[must_use]
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// Mutable registry access for geometry, position and address updates.
    pub fn registry_mut(&mut self) -> &mut EntityRegistry {
        &mut self.registry
    }

    #[must_use]
    pub fn engine(&self) -> &ReplayEngine {
        &self.engine
    }

    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.registry.get(id)
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

#[cfg(test)]
mod tests {
    use netanim_entity::{Color, EnergySource, UpdatePayload};

    use crate::surface::recording::RecordingSurface;
    use crate::timeline::ReplayState;

    use super::*;

    fn session() -> AnimationSession<RecordingSurface> {
        AnimationSession::new(RecordingSurface::default())
    }

    #[test]
    fn test_register_attaches_once() {
        let mut s = session();
        assert!(s.register_entity(EntityId(1), EntityParams::default()));
        assert!(!s.register_entity(EntityId(1), EntityParams::default()));
        assert_eq!(s.surface().added, vec![EntityId(1)]);
    }

    #[test]
    fn test_advance_updates_entities() {
        let mut s = session();
        s.register_entity(EntityId(1), EntityParams::default());
        s.ingest(UpdateEvent::new(
            1,
            0.5,
            UpdatePayload::new("low")
                .with_color(Color::new(0, 128, 0))
                .with_energy_source(EnergySource::battery(0.2).unwrap()),
        ))
        .unwrap();

        assert_eq!(s.next_wake_time(), Some(0.5));
        assert!(s.advance_to(1.0));
        let appearance = s.entity(EntityId(1)).unwrap().appearance();
        assert_eq!(appearance.label, "low");
        assert_eq!(appearance.fill, Color::new(0, 128, 0));
        assert_eq!(appearance.battery_level, Some(1));
        assert_eq!(s.next_wake_time(), None);
    }

    #[test]
    fn test_route_marks_survive_rewind() {
        let mut s = session();
        s.register_entity(EntityId(1), EntityParams::default());
        s.register_entity(EntityId(2), EntityParams::default());
        s.ingest(UpdateEvent::new(1, 1.0, UpdatePayload::new("a")))
            .unwrap();
        s.advance_to(2.0);

        s.mark_route(EntityId(1), true, true, false).unwrap();
        s.mark_route(EntityId(2), true, false, true).unwrap();
        assert!(s.advance_to(0.0));
        assert_eq!(s.entity(EntityId(1)).unwrap().appearance().label, "SOURCE");
        assert_eq!(s.entity(EntityId(1)).unwrap().label(), "1");

        s.clear_route_marks();
        assert_eq!(
            s.surface().routes,
            vec![EntityId(1), EntityId(2), EntityId(1), EntityId(2)]
        );
        assert!(!s.entity(EntityId(2)).unwrap().route().marked);
    }

    #[test]
    fn test_mark_route_unknown_entity() {
        let mut s = session();
        assert_eq!(
            s.mark_route(EntityId(3), true, false, false),
            Err(RegistryError::UnknownEntity(EntityId(3)))
        );
    }

    #[test]
    fn test_reset_clears_engine_and_registry() {
        let mut s = session();
        s.register_entity(EntityId(1), EntityParams::default());
        s.ingest(UpdateEvent::new(1, 1.0, UpdatePayload::new("a")))
            .unwrap();
        s.advance_to(1.0);

        s.reset();
        assert_eq!(s.engine().state(), ReplayState::Idle);
        assert!(s.registry().is_empty());
        assert_eq!(s.surface().removed, vec![EntityId(1)]);
        assert!(!s.advance_to(2.0));
    }
}
