//! A render surface that logs instead of drawing.

use netanim_entity::{Entity, EntityId};
use netanim_replay::RenderSurface;
use tracing::debug;

/// Logs every notification through `tracing` and keeps counters.
#[derive(Debug, Default)]
pub struct TracingSurface {
    added: usize,
    updates: usize,
    route_changes: usize,
    removed: usize,
}

impl TracingSurface {
    #[must_use]
    pub fn attached(&self) -> usize {
        self.added.saturating_sub(self.removed)
    }

    #[must_use]
    pub fn updates(&self) -> usize {
        self.updates
    }

    #[must_use]
    pub fn route_changes(&self) -> usize {
        self.route_changes
    }
}

impl RenderSurface for TracingSurface {
    fn entity_added(&mut self, entity: &Entity) {
        self.added += 1;
        debug!(entity = %entity.id(), shape = ?entity.geometry().shape, "attached entity");
    }

    fn entity_updated(&mut self, entity: &Entity) {
        self.updates += 1;
        let appearance = entity.appearance();
        debug!(
            entity = %entity.id(),
            label = %appearance.label,
            fill = %appearance.fill,
            visible = appearance.visible,
            battery = ?appearance.battery_level,
            "entity updated"
        );
    }

    fn route_changed(&mut self, entity: &Entity) {
        self.route_changes += 1;
        debug!(entity = %entity.id(), route = ?entity.route(), "route marking changed");
    }

    fn entity_removed(&mut self, id: EntityId) {
        self.removed += 1;
        debug!(entity = %id, "detached entity");
    }
}
