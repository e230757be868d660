//! Entity shape, size and scene-space placement.
//!
//! Simulation positions use a y-up coordinate system while the scene is
//! y-down, so [`Geometry::bounds`] flips the y axis against the scene height.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// The drawn shape of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Shape {
    #[default]
    Circle,
    Rectangle,
    Image,
}

/// Shape and unscaled size of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub shape: Shape,
    pub width: f32,
    pub height: f32,
}

impl Geometry {
    #[must_use]
    pub const fn new(shape: Shape, width: f32, height: f32) -> Self {
        Self {
            shape,
            width,
            height,
        }
    }

    /// A square geometry of the given shape.
    #[must_use]
    pub const fn square(shape: Shape, size: f32) -> Self {
        Self::new(shape, size, size)
    }

    #[must_use]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Compute the scene rectangle occupied by an entity at `position`.
    ///
    /// The size is scaled by `multiplier`. Circles are centred on the
    /// position; rectangles and images are anchored at it.
    #[must_use]
    pub fn bounds(&self, position: Vec2, scene_height: f32, multiplier: f32) -> Bounds {
        let anchor = Vec2::new(position.x, scene_height - position.y);
        let size = self.size() * multiplier;
        let min = match self.shape {
            Shape::Circle => anchor - size / 2.0,
            Shape::Rectangle | Shape::Image => anchor,
        };
        Bounds { min, size }
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::square(Shape::Circle, 1.0)
    }
}

/// An axis-aligned rectangle in y-down scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Top-left corner.
    pub min: Vec2,
    pub size: Vec2,
}

impl Bounds {
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.min + self.size / 2.0
    }

    /// Anchor for the entity label.
    #[must_use]
    pub fn bottom_right(&self) -> Vec2 {
        self.min + self.size
    }

    /// Anchor for the battery icon.
    #[must_use]
    pub fn bottom_left(&self) -> Vec2 {
        Vec2::new(self.min.x, self.min.y + self.size.y)
    }
}
