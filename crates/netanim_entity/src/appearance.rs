//! Render-facing snapshot of an entity.
//!
//! The animator core never draws anything. A rendering collaborator asks an
//! entity for its [`Appearance`] after being notified of a change and
//! redraws from that.

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Size multiplier applied to entities highlighted on a route.
pub const ROUTE_SIZE_MULTIPLIER: f32 = 2.0;

/// Label shown instead of the stored label on a route's source entity.
pub const SOURCE_LABEL: &str = "SOURCE";

/// Label shown instead of the stored label on a route's destination entity.
pub const DESTINATION_LABEL: &str = "DESTINATION";

/// Everything a renderer needs to draw one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appearance {
    pub fill: Color,
    pub outline: Color,
    /// Text drawn next to the entity. Route markings override the stored label.
    pub label: String,
    pub bold_label: bool,
    pub size_multiplier: f32,
    pub visible: bool,
    /// Battery icon level from 1 to 4, `None` when there is no battery.
    pub battery_level: Option<u8>,
}
