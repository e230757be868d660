//! Entity registry: identity-keyed storage of every animated entity.
//!
//! Entities are created on first reference by id and live until a full
//! reset. Iteration is in ascending id order.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use netanim_entity::{Entity, EntityId, EntityParams};
use tracing::{debug, info};

use crate::error::RegistryError;
use crate::surface::RenderSurface;

/// Owns every entity of one loaded animation.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    entities: BTreeMap<EntityId, Entity>,
}

impl EntityRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entities: BTreeMap::new(),
        }
    }

    /// Return the entity registered under `id`, creating it from `params`
    /// if it does not exist yet.
    ///
    /// The flag is `true` only when the entity was created by this call; it
    /// tells the caller to attach the entity to its render surface.
    pub fn get_or_create(&mut self, id: EntityId, params: EntityParams) -> (&mut Entity, bool) {
        match self.entities.entry(id) {
            Entry::Occupied(entry) => (entry.into_mut(), false),
            Entry::Vacant(entry) => {
                debug!(entity = %id, "created entity");
                (entry.insert(Entity::new(id, params)), true)
            }
        }
    }

    /// Returns the entity registered under `id`.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Returns a mutable reference to the entity registered under `id`.
    #[must_use]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Returns `true` if an entity is registered under `id`.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Record an IPv4 address for an existing entity.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownEntity`] if `id` is not registered.
    pub fn add_ipv4_address(
        &mut self,
        id: EntityId,
        ip: impl Into<String>,
    ) -> Result<(), RegistryError> {
        self.require_mut(id)?.add_ipv4_address(ip);
        Ok(())
    }

    /// Record a MAC address for an existing entity.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownEntity`] if `id` is not registered.
    pub fn add_mac_address(
        &mut self,
        id: EntityId,
        mac: impl Into<String>,
    ) -> Result<(), RegistryError> {
        self.require_mut(id)?.add_mac_address(mac);
        Ok(())
    }

    /// Find the entity that owns `ip`. Broadcast addresses are not resolved.
    #[must_use]
    pub fn find_by_ipv4(&self, ip: &str) -> Option<&Entity> {
        self.entities
            .values()
            .find(|e| e.ipv4_addresses().iter().any(|a| a == ip))
    }

    /// Find the entity that owns `mac`.
    #[must_use]
    pub fn find_by_mac(&self, mac: &str) -> Option<&Entity> {
        self.entities.values().find(|e| e.has_mac(mac))
    }

    /// Put every entity back to the display state it was created with and
    /// notify the surface of each one.
    pub fn restore_initial_state<S: RenderSurface + ?Sized>(&mut self, surface: &mut S) {
        for entity in self.entities.values_mut() {
            entity.restore_initial();
            surface.entity_updated(entity);
        }
    }

    /// Detach every entity from the surface and destroy it.
    pub fn reset<S: RenderSurface + ?Sized>(&mut self, surface: &mut S) {
        if self.entities.is_empty() {
            return;
        }
        info!(count = self.entities.len(), "destroying all entities");
        for id in self.entities.keys() {
            surface.entity_removed(*id);
        }
        self.entities.clear();
    }

    /// Returns an iterator over all entities in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Returns the number of registered entities.
    #[must_use]
    pub fn count(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if no entity is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    fn require_mut(&mut self, id: EntityId) -> Result<&mut Entity, RegistryError> {
        self.entities
            .get_mut(&id)
            .ok_or(RegistryError::UnknownEntity(id))
    }
}
