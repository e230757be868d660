//! RGB colors carried by update events.

use serde::{Deserialize, Serialize};

/// An opaque 8-bit RGB color.
///
/// Colors are plain values: an entity owns its color by value and replacing
/// it is a copy, never an allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const RED: Self = Self::new(255, 0, 0);
    pub const BLUE: Self = Self::new(0, 0, 255);

    /// Fill used for entities that never received an explicit color.
    pub const DEFAULT_FILL: Self = Self::RED;

    /// Fill used for entities highlighted on a route.
    pub const ROUTE_FILL: Self = Self::BLUE;

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
