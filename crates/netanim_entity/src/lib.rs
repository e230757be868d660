//! # netanim_entity
//!
//! The animated objects of a network animation. An [`Entity`] is one node of
//! the recorded simulation: it has an identity, geometry, display attributes
//! and an energy reading that change as update events are replayed.
//!
//! This crate provides:
//!
//! - [`Entity`]: the mutable state container for one animated node.
//! - [`EntityId`]: stable `u32` node identifiers.
//! - [`EnergySource`]: a validated residual-capacity reading.
//! - [`Geometry`] / [`Bounds`]: shape, size and scene-space placement.
//! - [`UpdatePayload`]: the attribute set an update event replaces.
//! - [`Appearance`]: the render-facing snapshot derived from entity state.

pub mod appearance;
pub mod color;
pub mod energy;
pub mod entity;
pub mod error;
pub mod geometry;
pub mod update;

pub use appearance::Appearance;
pub use color::Color;
pub use energy::{EnergySource, EnergySourceKind};
pub use entity::{DisplayState, Entity, EntityId, EntityParams, RouteMarking};
pub use error::EntityError;
pub use geometry::{Bounds, Geometry, Shape};
pub use update::UpdatePayload;
