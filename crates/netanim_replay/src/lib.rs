//! # netanim_replay
//!
//! Replays a time-ordered log of entity updates against a seekable
//! simulated clock.
//!
//! This crate provides:
//!
//! - [`EntityRegistry`]: identity-keyed get-or-create store of entities.
//! - [`UpdateEvent`]: one timestamped attribute change.
//! - [`ReplayEngine`]: the shared event log plus a cursor that applies
//!   every due update exactly once and rewinds on backward seeks.
//! - [`RenderSurface`]: hooks a renderer implements to follow changes.
//! - [`AnimationSession`]: owns one registry, one engine and one surface.

pub mod error;
pub mod event;
pub mod registry;
pub mod session;
pub mod surface;
pub mod timeline;

pub use error::{RegistryError, ReplayError};
pub use event::UpdateEvent;
pub use registry::EntityRegistry;
pub use session::AnimationSession;
pub use surface::{NullSurface, RenderSurface};
pub use timeline::{ReplayCursor, ReplayEngine, ReplayState};
