//! # netanim_player: Playback driver
//!
//! Plays a network animation against a simulated clock and reports every
//! state change through `tracing`.
//!
//! ## Startup Sequence
//!
//! 1. Initialise structured logging (`RUST_LOG` overrides the default filter).
//! 2. Build the demo animation session.
//! 3. Play it back, rewinding once mid-way through a [`PlaybackHandle`].

mod demo;
mod playback;
mod surface;

use std::time::Duration;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use playback::{PlaybackConfig, PlaybackHandle, PlaybackLoop};
use surface::TracingSurface;

/// Wall-clock delay before the demo rewind is requested.
const REWIND_AFTER: Duration = Duration::from_millis(1500);

/// Simulated time the demo rewinds to.
const REWIND_TO: f64 = 2.0;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("netanim_player=info".parse()?),
        )
        .init();

    info!("network animation player starting");

    let session = demo::build_session(TracingSurface::default())?;
    let config = PlaybackConfig::default()
        .with_speed(4.0)
        .with_end_time(demo::DURATION)
        .with_skip_idle(true);

    let (mut playback, handle) = PlaybackLoop::new(session, config);
    let rewind = tokio::spawn(rewind_once(handle));

    let frames = playback.run().await;
    rewind.abort();

    let surface = playback.session().surface();
    info!(
        frames,
        sim_time = playback.sim_time(),
        attached = surface.attached(),
        updates = surface.updates(),
        route_changes = surface.route_changes(),
        "playback complete"
    );

    playback.session_mut().reset();
    info!("network animation player shut down");
    Ok(())
}

async fn rewind_once(handle: PlaybackHandle) {
    tokio::time::sleep(REWIND_AFTER).await;
    match handle.seek(REWIND_TO).await {
        Ok(()) => info!(to = REWIND_TO, "requested rewind"),
        Err(err) => warn!(%err, "rewind request failed"),
    }
}
