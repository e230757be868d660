//! The attribute set replaced by one update event.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::energy::EnergySource;

/// The mutable display attributes carried by an update event.
///
/// Every update replaces the full set. The one exception is color: a
/// `None` color means "keep the current color" rather than "reset it".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdatePayload {
    pub color: Option<Color>,
    /// New label. An empty label falls back to the entity id.
    pub label: String,
    pub visible: bool,
    pub energy_source: EnergySource,
}

impl UpdatePayload {
    /// A visible update with the given label, no color change and no energy source.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            color: None,
            label: label.into(),
            visible: true,
            energy_source: EnergySource::none(),
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    #[must_use]
    pub fn with_energy_source(mut self, energy_source: EnergySource) -> Self {
        self.energy_source = energy_source;
        self
    }

    /// Returns `true` if applying this payload leaves the entity color untouched.
    #[must_use]
    pub fn skips_color(&self) -> bool {
        self.color.is_none()
    }
}
