//! Built-in demo animation.
//!
//! A small wireless topology: one rectangular sink and three battery-powered
//! sensors whose batteries drain at different rates. Sensors turn orange
//! when their battery falls to a quarter and disappear once it is empty.
//! The sensors' route to the sink is highlighted.

use anyhow::Result;
use glam::Vec2;
use netanim_entity::{
    Color, EnergySource, EntityId, EntityParams, Geometry, Shape, UpdatePayload,
};
use netanim_replay::{AnimationSession, RenderSurface, UpdateEvent};

/// Simulated length of the demo, in seconds.
pub const DURATION: f64 = 10.0;

const SINK: EntityId = EntityId(0);

/// Sensor id, position and battery drain per simulated second.
const SENSORS: [(u32, Vec2, f64); 3] = [
    (1, Vec2::new(20.0, 80.0), 0.05),
    (2, Vec2::new(50.0, 50.0), 0.08),
    (3, Vec2::new(80.0, 20.0), 0.12),
];

const LOW_BATTERY: f64 = 0.25;
const LOW_BATTERY_COLOR: Color = Color::new(255, 165, 0);

/// Build a session containing the demo topology and its update log.
///
/// # Errors
///
/// Returns an error if an update carries an invalid capacity or time.
pub fn build_session<S: RenderSurface>(surface: S) -> Result<AnimationSession<S>> {
    let mut session = AnimationSession::new(surface);

    session.register_entity(
        SINK,
        EntityParams::new(Geometry::new(Shape::Rectangle, 6.0, 4.0))
            .with_position(Vec2::new(90.0, 90.0))
            .with_label("sink")
            .with_color(Color::new(0, 160, 0)),
    );
    session.registry_mut().add_ipv4_address(SINK, "10.1.1.1")?;
    session
        .registry_mut()
        .add_mac_address(SINK, "00:00:00:00:00:01")?;

    for (id, position, _) in SENSORS {
        let entity = EntityId(id);
        session.register_entity(
            entity,
            EntityParams::new(Geometry::square(Shape::Circle, 3.0))
                .with_position(position)
                .with_energy_source(EnergySource::battery(1.0)?),
        );
        session
            .registry_mut()
            .add_ipv4_address(entity, format!("10.1.1.{}", id + 1))?;
        session
            .registry_mut()
            .add_mac_address(entity, format!("00:00:00:00:00:{:02x}", id + 1))?;
    }

    // One update per sensor per simulated second, appended in time order.
    for second in 0..=DURATION as u32 {
        let time = f64::from(second);
        for (id, _, drain) in SENSORS {
            let capacity = (1.0 - drain * time).max(0.0);
            let mut payload = UpdatePayload::new(format!("s{id} {:.0}%", capacity * 100.0))
                .with_visible(capacity > 0.0)
                .with_energy_source(EnergySource::battery(capacity)?);
            if capacity <= LOW_BATTERY {
                payload = payload.with_color(LOW_BATTERY_COLOR);
            }
            session.ingest(UpdateEvent::new(id, time, payload))?;
        }
    }

    session.mark_route(EntityId(1), true, true, false)?;
    session.mark_route(EntityId(2), true, false, false)?;
    session.mark_route(SINK, true, false, true)?;

    Ok(session)
}
