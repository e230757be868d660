//! Energy source readings.
//!
//! An [`EnergySource`] pairs a source kind with a residual-capacity fraction.
//! The capacity is validated on every write path, including
//! deserialisation, so an out-of-range value can never be stored.

use serde::{Deserialize, Serialize};

use crate::error::EntityError;

/// The kind of energy source attached to an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EnergySourceKind {
    /// The entity has no modelled energy source.
    #[default]
    None,
    /// A battery whose residual capacity is rendered as a level icon.
    Battery,
}

/// A residual-capacity reading constrained to the closed interval `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEnergySource")]
pub struct EnergySource {
    kind: EnergySourceKind,
    capacity: f64,
}

impl EnergySource {
    /// Create a validated energy source.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError::InvalidCapacity`] if `capacity` is outside
    /// `[0, 1]` or is NaN.
    pub fn new(kind: EnergySourceKind, capacity: f64) -> Result<Self, EntityError> {
        validate_capacity(capacity)?;
        Ok(Self { kind, capacity })
    }

    /// An entity without an energy source.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            kind: EnergySourceKind::None,
            capacity: 1.0,
        }
    }

    /// A battery with the given residual capacity.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError::InvalidCapacity`] if `capacity` is outside `[0, 1]`.
    pub fn battery(capacity: f64) -> Result<Self, EntityError> {
        Self::new(EnergySourceKind::Battery, capacity)
    }

    #[must_use]
    pub fn kind(&self) -> EnergySourceKind {
        self.kind
    }

    #[must_use]
    pub fn residual_capacity(&self) -> f64 {
        self.capacity
    }

    /// Replace the residual capacity. On error the stored value is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError::InvalidCapacity`] if `capacity` is outside `[0, 1]`.
    pub fn set_residual_capacity(&mut self, capacity: f64) -> Result<(), EntityError> {
        validate_capacity(capacity)?;
        self.capacity = capacity;
        Ok(())
    }

    /// The battery icon level for this source, from 1 (nearly empty) to 4
    /// (full). Returns `None` for sources that are not batteries.
    #[must_use]
    pub fn battery_level(&self) -> Option<u8> {
        if self.kind != EnergySourceKind::Battery {
            return None;
        }
        let level = match self.capacity {
            c if c > 0.75 => 4,
            c if c > 0.5 => 3,
            c if c > 0.25 => 2,
            _ => 1,
        };
        Some(level)
    }
}

impl Default for EnergySource {
    fn default() -> Self {
        Self::none()
    }
}

fn validate_capacity(capacity: f64) -> Result<(), EntityError> {
    if (0.0..=1.0).contains(&capacity) {
        Ok(())
    } else {
        Err(EntityError::InvalidCapacity { capacity })
    }
}

/// Unvalidated wire form of [`EnergySource`].
#[derive(Deserialize)]
struct RawEnergySource {
    kind: EnergySourceKind,
    capacity: f64,
}

impl TryFrom<RawEnergySource> for EnergySource {
    type Error = EntityError;

    fn try_from(raw: RawEnergySource) -> Result<Self, Self::Error> {
        Self::new(raw.kind, raw.capacity)
    }
}
