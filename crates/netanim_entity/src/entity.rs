//! The animated entity and its identifier.
//!
//! An [`Entity`] is created once per node id and then mutated by replayed
//! update events. The attributes an update replaces live in
//! [`DisplayState`]; geometry, position, route markings and addresses are
//! set through their own operations and are untouched by replay.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::appearance::{
    Appearance, DESTINATION_LABEL, ROUTE_SIZE_MULTIPLIER, SOURCE_LABEL,
};
use crate::color::Color;
use crate::energy::EnergySource;
use crate::geometry::{Bounds, Geometry};
use crate::update::UpdatePayload;

/// A stable node identifier taken from the simulation trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    #[must_use]
    pub const fn from_raw(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn id(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// The attributes replaced wholesale by an update event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayState {
    /// `None` until an explicit color is set; rendered as [`Color::DEFAULT_FILL`].
    pub color: Option<Color>,
    pub label: String,
    pub visible: bool,
    pub energy_source: EnergySource,
}

/// Presentational route highlighting. Never part of an update event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RouteMarking {
    pub marked: bool,
    pub source: bool,
    pub destination: bool,
}

/// Parameters used to construct an entity on first reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityParams {
    pub geometry: Geometry,
    pub position: Vec2,
    pub label: String,
    pub color: Option<Color>,
    pub energy_source: EnergySource,
}

impl EntityParams {
    #[must_use]
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_energy_source(mut self, energy_source: EnergySource) -> Self {
        self.energy_source = energy_source;
        self
    }
}

impl Default for EntityParams {
    fn default() -> Self {
        Self {
            geometry: Geometry::default(),
            position: Vec2::ZERO,
            label: String::new(),
            color: None,
            energy_source: EnergySource::none(),
        }
    }
}

/// One animated node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entity {
    id: EntityId,
    geometry: Geometry,
    position: Vec2,
    display: DisplayState,
    /// Display state at creation, restored when replay restarts from zero.
    initial: DisplayState,
    route: RouteMarking,
    ipv4_addresses: Vec<String>,
    mac_addresses: Vec<String>,
}

impl Entity {
    /// Create an entity. An empty label is replaced by the stringified id.
    #[must_use]
    pub fn new(id: EntityId, params: EntityParams) -> Self {
        let display = DisplayState {
            color: params.color,
            label: label_or_id(id, params.label),
            visible: true,
            energy_source: params.energy_source,
        };
        Self {
            id,
            geometry: params.geometry,
            position: params.position,
            initial: display.clone(),
            display,
            route: RouteMarking::default(),
            ipv4_addresses: Vec::new(),
            mac_addresses: Vec::new(),
        }
    }

    /// Returns the entity's identifier.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the shape and unscaled size.
    #[must_use]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[must_use]
    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    /// Returns the explicit fill color, if one was ever set.
    #[must_use]
    pub fn color(&self) -> Option<Color> {
        self.display.color
    }

    /// The stored label, ignoring any route override.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.display.label
    }

    /// Returns whether the entity is drawn.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.display.visible
    }

    #[must_use]
    pub fn energy_source(&self) -> &EnergySource {
        &self.display.energy_source
    }

    #[must_use]
    pub fn route(&self) -> RouteMarking {
        self.route
    }

    /// Replace the display attributes from an update event.
    ///
    /// The color is only replaced when the payload carries one.
    pub fn apply_update(&mut self, payload: &UpdatePayload) {
        if let Some(color) = payload.color {
            self.display.color = Some(color);
        }
        self.display.label = label_or_id(self.id, payload.label.clone());
        self.display.visible = payload.visible;
        self.display.energy_source = payload.energy_source;
    }

    /// Restore the display attributes captured at creation.
    pub fn restore_initial(&mut self) {
        self.display = self.initial.clone();
    }

    pub fn set_color(&mut self, color: Color) {
        self.display.color = Some(color);
    }

    pub fn set_energy_source(&mut self, energy_source: EnergySource) {
        self.display.energy_source = energy_source;
    }

    /// Set width and height to the same value.
    pub fn set_size(&mut self, size: f32) {
        self.geometry.width = size;
        self.geometry.height = size;
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Set the route highlighting flags. Replay state is not touched.
    pub fn mark_on_route(&mut self, marked: bool, source: bool, destination: bool) {
        self.route = RouteMarking {
            marked,
            source,
            destination,
        };
    }

    pub fn add_ipv4_address(&mut self, ip: impl Into<String>) {
        self.ipv4_addresses.push(ip.into());
    }

    pub fn add_mac_address(&mut self, mac: impl Into<String>) {
        self.mac_addresses.push(mac.into());
    }

    #[must_use]
    pub fn ipv4_addresses(&self) -> &[String] {
        &self.ipv4_addresses
    }

    #[must_use]
    pub fn mac_addresses(&self) -> &[String] {
        &self.mac_addresses
    }

    /// Returns `true` if `ip` is one of this entity's addresses or a
    /// broadcast address (last quad `255`). Anything that is not a dotted
    /// quad never matches.
    #[must_use]
    pub fn has_ipv4(&self, ip: &str) -> bool {
        let quads: Vec<&str> = ip.split('.').collect();
        if quads.len() != 4 {
            return false;
        }
        quads[3] == "255" || self.ipv4_addresses.iter().any(|a| a == ip)
    }

    /// Returns `true` if `mac` is a six-byte address owned by this entity.
    #[must_use]
    pub fn has_mac(&self, mac: &str) -> bool {
        mac.split(':').count() == 6 && self.mac_addresses.iter().any(|a| a == mac)
    }

    /// The render-facing snapshot of this entity.
    #[must_use]
    pub fn appearance(&self) -> Appearance {
        let marked = self.route.marked;
        let fill = if marked {
            Color::ROUTE_FILL
        } else {
            self.display.color.unwrap_or(Color::DEFAULT_FILL)
        };
        let label = match (marked, self.route.source, self.route.destination) {
            (true, true, _) => SOURCE_LABEL.to_owned(),
            (true, false, true) => DESTINATION_LABEL.to_owned(),
            _ => self.display.label.clone(),
        };
        Appearance {
            fill,
            outline: Color::RED,
            label,
            bold_label: marked,
            size_multiplier: self.size_multiplier(),
            visible: self.display.visible,
            battery_level: self.display.energy_source.battery_level(),
        }
    }

    /// Scene rectangle for this entity in a scene of the given height.
    #[must_use]
    pub fn bounds(&self, scene_height: f32) -> Bounds {
        self.geometry
            .bounds(self.position, scene_height, self.size_multiplier())
    }

    fn size_multiplier(&self) -> f32 {
        if self.route.marked {
            ROUTE_SIZE_MULTIPLIER
        } else {
            1.0
        }
    }
}

fn label_or_id(id: EntityId, label: String) -> String {
    if label.is_empty() {
        id.to_string()
    } else {
        label
    }
}

#[cfg(test)]
mod tests {
    use crate::energy::EnergySourceKind;
    use crate::geometry::Shape;

    use super::*;

    fn entity(id: u32) -> Entity {
        Entity::new(EntityId(id), EntityParams::default())
    }

    #[test]
    fn test_empty_label_defaults_to_id() {
        let e = entity(7);
        assert_eq!(e.label(), "7");
        let named = Entity::new(EntityId(8), EntityParams::default().with_label("router"));
        assert_eq!(named.label(), "router");
    }

    #[test]
    fn test_apply_update_replaces_attributes() {
        let mut e = entity(1);
        let battery = EnergySource::battery(0.6).unwrap();
        e.apply_update(
            &UpdatePayload::new("gateway")
                .with_color(Color::new(0, 255, 0))
                .with_visible(false)
                .with_energy_source(battery),
        );
        assert_eq!(e.label(), "gateway");
        assert_eq!(e.color(), Some(Color::new(0, 255, 0)));
        assert!(!e.is_visible());
        assert_eq!(e.energy_source().kind(), EnergySourceKind::Battery);
        assert_eq!(e.energy_source().residual_capacity(), 0.6);
    }

    #[test]
    fn test_apply_update_skip_color_keeps_color() {
        let mut e = Entity::new(
            EntityId(1),
            EntityParams::default().with_color(Color::new(1, 2, 3)),
        );
        let payload = UpdatePayload::new("");
        assert!(payload.skips_color());
        e.apply_update(&payload);
        assert_eq!(e.color(), Some(Color::new(1, 2, 3)));
        assert_eq!(e.label(), "1");
    }

    #[test]
    fn test_restore_initial_reverts_display_only() {
        let mut e = entity(4);
        e.set_size(3.0);
        e.mark_on_route(true, false, false);
        e.apply_update(&UpdatePayload::new("x").with_color(Color::BLUE));
        e.restore_initial();
        assert_eq!(e.label(), "4");
        assert_eq!(e.color(), None);
        assert_eq!(e.geometry().width, 3.0);
        assert!(e.route().marked);
    }

    #[test]
    fn test_route_marking_overrides_label_and_fill() {
        let mut e = Entity::new(
            EntityId(2),
            EntityParams::new(Geometry::square(Shape::Circle, 4.0)).with_label("n2"),
        );
        let plain = e.appearance();
        assert_eq!(plain.fill, Color::DEFAULT_FILL);
        assert_eq!(plain.label, "n2");
        assert_eq!(plain.size_multiplier, 1.0);

        e.mark_on_route(true, true, true);
        let marked = e.appearance();
        assert_eq!(marked.label, SOURCE_LABEL);
        assert_eq!(marked.fill, Color::ROUTE_FILL);
        assert!(marked.bold_label);
        assert_eq!(e.bounds(100.0).size, Vec2::splat(8.0));

        e.mark_on_route(true, false, true);
        assert_eq!(e.appearance().label, DESTINATION_LABEL);

        e.mark_on_route(false, false, true);
        assert_eq!(e.appearance().label, "n2");
        assert_eq!(e.label(), "n2");
    }

    #[test]
    fn test_set_energy_source_updates_battery_level() {
        let mut e = entity(5);
        assert_eq!(e.appearance().battery_level, None);

        e.set_energy_source(EnergySource::battery(0.8).unwrap());
        assert_eq!(e.appearance().battery_level, Some(4));
        e.set_energy_source(EnergySource::battery(0.3).unwrap());
        assert_eq!(e.appearance().battery_level, Some(2));
        assert_eq!(e.display().energy_source.residual_capacity(), 0.3);

        e.restore_initial();
        assert_eq!(e.energy_source().kind(), EnergySourceKind::None);
    }

    #[test]
    fn test_setters_color_and_position() {
        let mut e = entity(6);
        e.set_color(Color::new(10, 20, 30));
        e.set_position(Vec2::new(4.0, 5.0));
        assert_eq!(e.color(), Some(Color::new(10, 20, 30)));
        assert_eq!(e.display().color, Some(Color::new(10, 20, 30)));
        assert_eq!(e.appearance().fill, Color::new(10, 20, 30));
        assert_eq!(e.position(), Vec2::new(4.0, 5.0));

        // A payload without a color keeps the one set directly.
        e.apply_update(&UpdatePayload::new("six"));
        assert_eq!(e.color(), Some(Color::new(10, 20, 30)));
        assert_eq!(e.position(), Vec2::new(4.0, 5.0));
    }

    #[test]
    fn test_ipv4_matching() {
        let mut e = entity(1);
        e.add_ipv4_address("10.1.1.1");
        assert!(e.has_ipv4("10.1.1.1"));
        assert!(e.has_ipv4("10.1.1.255"));
        assert!(!e.has_ipv4("10.1.1.2"));
        assert!(!e.has_ipv4("10.1.1"));
    }

    #[test]
    fn test_mac_matching() {
        let mut e = entity(1);
        e.add_mac_address("00:00:00:00:00:01");
        assert_eq!(e.mac_addresses(), ["00:00:00:00:00:01".to_owned()]);
        assert!(e.has_mac("00:00:00:00:00:01"));
        assert!(!e.has_mac("00:00:00:00:00:02"));
        assert!(!e.has_mac("00:01"));
    }

    #[test]
    fn test_entity_id_serialization_roundtrip() {
        let id = EntityId::from_raw(999);
        let bytes = rmp_serde::to_vec(&id).unwrap();
        let restored: EntityId = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(id, restored);
    }
}
