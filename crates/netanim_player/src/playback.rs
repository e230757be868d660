//! Playback loop.
//!
//! Drives an [`AnimationSession`] from a simulated clock:
//!
//! 1. Apply any pending playback commands (seek, pause, speed changes).
//! 2. Advance the simulated clock by the frame duration scaled by speed.
//! 3. Ask the session to bring entities up to the new time.
//! 4. When nothing changed and `skip_idle` is set, jump straight to the
//!    next wake time instead of polling empty frames.
//!
//! The session is owned by the loop. Other tasks control playback through
//! a [`PlaybackHandle`], which sends [`PlaybackCommand`]s over a channel.

// Handle methods and accessors not used by main() are exercised by tests.
#![allow(dead_code)]

use std::time::Duration;

use anyhow::{Context, Result};
use netanim_replay::{AnimationSession, RenderSurface};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Capacity of the playback command channel.
const COMMAND_BUFFER: usize = 32;

const DEFAULT_FRAME_RATE: f64 = 30.0;

/// Configuration for the playback loop.
#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    /// Frames per second of wall-clock time.
    pub frame_rate: f64,
    /// Simulated seconds per wall-clock second.
    pub speed: f64,
    /// Stop once the clock reaches this time. Without it, playback stops
    /// when no updates remain.
    pub end_time: Option<f64>,
    /// Maximum number of frames to run (0 = unlimited).
    pub max_frames: u64,
    /// Jump the clock to the next update instead of rendering idle frames.
    pub skip_idle: bool,
}

impl PlaybackConfig {
    /// Set the frame rate. Rates that do not give a positive, representable
    /// frame period are ignored.
    #[must_use]
    pub fn with_frame_rate(mut self, frame_rate: f64) -> Self {
        if frame_period(frame_rate).is_some() {
            self.frame_rate = frame_rate;
        } else {
            warn!(frame_rate, "ignoring invalid frame rate");
        }
        self
    }

    #[must_use]
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    #[must_use]
    pub fn with_end_time(mut self, end_time: f64) -> Self {
        self.end_time = Some(end_time);
        self
    }

    #[must_use]
    pub fn with_max_frames(mut self, max_frames: u64) -> Self {
        self.max_frames = max_frames;
        self
    }

    #[must_use]
    pub fn with_skip_idle(mut self, skip_idle: bool) -> Self {
        self.skip_idle = skip_idle;
        self
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            frame_rate: DEFAULT_FRAME_RATE,
            speed: 1.0,
            end_time: None,
            max_frames: 0,
            skip_idle: false,
        }
    }
}

/// Wall-clock duration of one frame, or `None` if `frame_rate` is not
/// positive and finite or the period rounds to zero.
fn frame_period(frame_rate: f64) -> Option<Duration> {
    if !(frame_rate.is_finite() && frame_rate > 0.0) {
        return None;
    }
    Duration::try_from_secs_f64(1.0 / frame_rate)
        .ok()
        .filter(|period| !period.is_zero())
}

/// Requests accepted by a running [`PlaybackLoop`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackCommand {
    /// Move the simulated clock to the given time (clamped at zero).
    Seek(f64),
    Pause,
    Resume,
    /// Change the playback speed. Non-positive values are ignored.
    SetSpeed(f64),
    Stop,
}

/// Cloneable sender for controlling a [`PlaybackLoop`] from other tasks.
#[derive(Debug, Clone)]
pub struct PlaybackHandle {
    tx: mpsc::Sender<PlaybackCommand>,
}

impl PlaybackHandle {
    /// Send a command to the loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the playback loop has been dropped.
    pub async fn send(&self, command: PlaybackCommand) -> Result<()> {
        self.tx
            .send(command)
            .await
            .context("playback loop is no longer running")
    }

    /// # Errors
    ///
    /// Returns an error if the playback loop has been dropped.
    pub async fn seek(&self, time: f64) -> Result<()> {
        self.send(PlaybackCommand::Seek(time)).await
    }

    /// # Errors
    ///
    /// Returns an error if the playback loop has been dropped.
    pub async fn pause(&self) -> Result<()> {
        self.send(PlaybackCommand::Pause).await
    }

    /// # Errors
    ///
    /// Returns an error if the playback loop has been dropped.
    pub async fn resume(&self) -> Result<()> {
        self.send(PlaybackCommand::Resume).await
    }

    /// # Errors
    ///
    /// Returns an error if the playback loop has been dropped.
    pub async fn stop(&self) -> Result<()> {
        self.send(PlaybackCommand::Stop).await
    }
}

/// What one frame did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutcome {
    pub frame_id: u64,
    pub sim_time: f64,
    /// Whether the scene needs repainting.
    pub updated: bool,
    pub next_wake: Option<f64>,
}

/// What woke the loop up.
enum Wake {
    Frame,
    Command(PlaybackCommand),
    ChannelClosed,
}

/// Owns an animation session and plays it back against a simulated clock.
#[derive(Debug)]
pub struct PlaybackLoop<S: RenderSurface> {
    session: AnimationSession<S>,
    config: PlaybackConfig,
    sim_time: f64,
    frame_id: u64,
    paused: bool,
    stopped: bool,
    commands: mpsc::Receiver<PlaybackCommand>,
    commands_open: bool,
}

impl<S: RenderSurface> PlaybackLoop<S> {
    /// Create a loop over `session` and the handle that controls it.
    #[must_use]
    pub fn new(session: AnimationSession<S>, config: PlaybackConfig) -> (Self, PlaybackHandle) {
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        let playback = Self {
            session,
            config,
            sim_time: 0.0,
            frame_id: 0,
            paused: false,
            stopped: false,
            commands: rx,
            commands_open: true,
        };
        (playback, PlaybackHandle { tx })
    }

    /// Returns the session being played.
    #[must_use]
    pub fn session(&self) -> &AnimationSession<S> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut AnimationSession<S> {
        &mut self.session
    }

    /// Returns the current simulated time.
    #[must_use]
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    /// Returns the number of frames run so far.
    #[must_use]
    pub fn frame_id(&self) -> u64 {
        self.frame_id
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Apply one playback command.
    pub fn apply(&mut self, command: PlaybackCommand) {
        debug!(?command, sim_time = self.sim_time, "playback command");
        match command {
            PlaybackCommand::Seek(time) => self.sim_time = time.max(0.0),
            PlaybackCommand::Pause => self.paused = true,
            PlaybackCommand::Resume => self.paused = false,
            PlaybackCommand::SetSpeed(speed) if speed > 0.0 && speed.is_finite() => {
                self.config.speed = speed;
            }
            PlaybackCommand::SetSpeed(speed) => warn!(speed, "ignoring invalid playback speed"),
            PlaybackCommand::Stop => self.stopped = true,
        }
    }

    /// Run one frame covering `dt` wall-clock seconds.
    pub fn step(&mut self, dt: f64) -> FrameOutcome {
        self.frame_id += 1;

        if !self.paused {
            self.sim_time += dt * self.config.speed;
        }
        if let Some(end) = self.config.end_time {
            self.sim_time = self.sim_time.min(end);
        }

        let mut updated = self.session.advance_to(self.sim_time);
        if !updated
            && !self.paused
            && self.config.skip_idle
            && let Some(wake) = self.session.next_wake_time()
            && self.config.end_time.is_none_or(|end| wake <= end)
        {
            debug!(from = self.sim_time, to = wake, "skipping idle frames");
            self.sim_time = wake;
            updated = self.session.advance_to(wake);
        }

        if updated {
            debug!(frame_id = self.frame_id, sim_time = self.sim_time, "repaint");
        }

        FrameOutcome {
            frame_id: self.frame_id,
            sim_time: self.sim_time,
            updated,
            next_wake: self.session.next_wake_time(),
        }
    }

    /// Returns `true` once playback should end.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        if self.stopped {
            return true;
        }
        if self.config.max_frames > 0 && self.frame_id >= self.config.max_frames {
            return true;
        }
        match self.config.end_time {
            Some(end) => self.sim_time >= end,
            None => self.frame_id > 0 && !self.paused && self.session.next_wake_time().is_none(),
        }
    }

    /// Play until finished, pacing frames with a tokio interval and
    /// handling commands as they arrive. Returns the number of frames run.
    pub async fn run(&mut self) -> u64 {
        let frame = match frame_period(self.config.frame_rate) {
            Some(frame) => frame,
            None => {
                warn!(
                    frame_rate = self.config.frame_rate,
                    fallback = DEFAULT_FRAME_RATE,
                    "invalid frame rate, using default"
                );
                self.config.frame_rate = DEFAULT_FRAME_RATE;
                Duration::from_secs_f64(1.0 / DEFAULT_FRAME_RATE)
            }
        };
        let mut interval = tokio::time::interval(frame);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            frame_rate = self.config.frame_rate,
            speed = self.config.speed,
            end_time = ?self.config.end_time,
            events = self.session.engine().len(),
            "starting playback"
        );

        let start_frame = self.frame_id;
        while !self.is_finished() {
            let wake = tokio::select! {
                _ = interval.tick() => Wake::Frame,
                command = self.commands.recv(), if self.commands_open => match command {
                    Some(command) => Wake::Command(command),
                    None => Wake::ChannelClosed,
                },
            };

            match wake {
                Wake::Frame => {
                    self.step(frame.as_secs_f64());
                }
                Wake::Command(command) => self.apply(command),
                Wake::ChannelClosed => self.commands_open = false,
            }
        }

        let frames = self.frame_id - start_frame;
        info!(frames, sim_time = self.sim_time, "playback finished");
        frames
    }
}
