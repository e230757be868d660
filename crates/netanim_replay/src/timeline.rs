//! Timed update replay.
//!
//! The [`ReplayEngine`] holds every update event of an animation in one
//! shared log ordered by time, and a [`ReplayCursor`] marking the first
//! event not yet applied. Advancing to a later time applies the due events
//! from the cursor onward, so steady playback touches each event once.
//! Moving to an earlier time rewinds: entity display state is restored to
//! its creation snapshot and the log is replayed from the start.
//!
//! ## Cursor invariant
//!
//! After [`ReplayEngine::advance_to`] returns, every event before
//! `cursor.position` has `time <= last_requested_time` and has been
//! applied, and the event at `cursor.position` (if any) lies in the
//! future. The engine peeks at that event's time before applying it, so a
//! future event is never consumed.

use tracing::{debug, info, trace, warn};

use crate::error::ReplayError;
use crate::event::UpdateEvent;
use crate::registry::EntityRegistry;
use crate::surface::RenderSurface;

/// Operational state of a [`ReplayEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayState {
    /// No events have been ingested.
    Idle,
    /// The cursor is being reset for a backward jump. Only held inside
    /// [`ReplayEngine::advance_to`].
    Seeking,
    /// The cursor moves forward through the log.
    Advancing,
}

/// Position of the replay within the event log.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplayCursor {
    /// Index of the first unapplied event.
    pub position: usize,
    /// The last time passed to [`ReplayEngine::advance_to`].
    pub last_requested_time: f64,
    /// Time of the first unapplied event; `None` when nothing remains.
    pub next_wake_time: Option<f64>,
}

impl ReplayCursor {
    const START: Self = Self {
        position: 0,
        last_requested_time: 0.0,
        next_wake_time: None,
    };
}

impl Default for ReplayCursor {
    fn default() -> Self {
        Self::START
    }
}

/// The shared update log of one animation and its replay cursor.
#[derive(Debug)]
pub struct ReplayEngine {
    events: Vec<UpdateEvent>,
    cursor: ReplayCursor,
    state: ReplayState,
    /// Set when an ingest lands after playback made progress; the next
    /// advance then re-derives entity state from scratch.
    restore_pending: bool,
}

impl ReplayEngine {
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            cursor: ReplayCursor::START,
            state: ReplayState::Idle,
            restore_pending: false,
        }
    }

    /// Append an update event to the log.
    ///
    /// Events normally arrive in time order and are appended in O(1). An
    /// event older than the tail is inserted after every event with a time
    /// less than or equal to its own, keeping the log sorted and ties in
    /// ingestion order. That insert shifts the tail, so it costs O(n): a
    /// trace that lists each entity's events as a block loads in O(n²).
    /// Such traces should be merged by time before ingestion. Either way the cursor goes back to the start of the
    /// log and the last requested time to zero, so the next advance replays
    /// everything.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::InvalidTime`] if the event time is negative or
    /// not finite. The log is unchanged in that case.
    pub fn ingest(&mut self, event: UpdateEvent) -> Result<(), ReplayError> {
        if !event.time.is_finite() || event.time < 0.0 {
            return Err(ReplayError::InvalidTime { time: event.time });
        }

        let in_order = self.events.last().is_none_or(|last| last.time <= event.time);
        if in_order {
            self.events.push(event);
        } else {
            let index = self.events.partition_point(|e| e.time <= event.time);
            warn!(
                entity = %event.target,
                time = event.time,
                index,
                "out-of-order update event inserted into log"
            );
            self.events.insert(index, event);
        }

        if self.cursor.position > 0 || self.cursor.last_requested_time > 0.0 {
            self.restore_pending = true;
        }
        self.cursor = ReplayCursor {
            next_wake_time: self.events.first().map(|e| e.time),
            ..ReplayCursor::START
        };
        self.state = ReplayState::Advancing;
        Ok(())
    }

    /// Apply every event due at `time` that has not been applied yet.
    ///
    /// A `time` earlier than the previous call rewinds first: entity display
    /// state is restored to its creation snapshot and the log replays from
    /// the start. Events whose time equals `time` are applied. Events aimed
    /// at entities missing from `registry` are skipped.
    ///
    /// Returns `true` if any entity changed, which includes every rewind.
    pub fn advance_to<S: RenderSurface + ?Sized>(
        &mut self,
        time: f64,
        registry: &mut EntityRegistry,
        surface: &mut S,
    ) -> bool {
        if self.events.is_empty() {
            return false;
        }
        if time.is_nan() {
            warn!("ignoring advance to NaN time");
            return false;
        }

        let mut updated = false;
        if time < self.cursor.last_requested_time || self.restore_pending {
            self.rewind(time, registry, surface);
            updated = true;
        }
        self.cursor.last_requested_time = time;

        while let Some(event) = self.events.get(self.cursor.position) {
            if event.time > time {
                self.cursor.next_wake_time = Some(event.time);
                return updated;
            }

            match registry.get_mut(event.target) {
                Some(entity) => {
                    entity.apply_update(&event.payload);
                    surface.entity_updated(entity);
                    updated = true;
                    trace!(entity = %event.target, time = event.time, "applied update");
                }
                None => {
                    warn!(
                        entity = %event.target,
                        time = event.time,
                        "dropping update for unknown entity"
                    );
                }
            }
            self.cursor.position += 1;
        }

        self.cursor.next_wake_time = None;
        updated
    }

    /// Time of the next event that would change state, or `None` when the
    /// log is empty or fully applied.
    #[must_use]
    pub fn next_wake_time(&self) -> Option<f64> {
        if self.cursor.position >= self.events.len() {
            return None;
        }
        self.cursor.next_wake_time
    }

    /// Drop every event and return to [`ReplayState::Idle`].
    pub fn reset(&mut self) {
        info!(events = self.events.len(), "resetting replay engine");
        self.events.clear();
        self.cursor = ReplayCursor::START;
        self.state = ReplayState::Idle;
        self.restore_pending = false;
    }

    /// Returns the current operational state.
    #[must_use]
    pub fn state(&self) -> ReplayState {
        self.state
    }

    /// Returns the replay cursor.
    #[must_use]
    pub fn cursor(&self) -> &ReplayCursor {
        &self.cursor
    }

    /// The ingested log in replay order.
    #[must_use]
    pub fn events(&self) -> &[UpdateEvent] {
        &self.events
    }

    /// Returns the number of ingested events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if no events have been ingested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn rewind<S: RenderSurface + ?Sized>(
        &mut self,
        time: f64,
        registry: &mut EntityRegistry,
        surface: &mut S,
    ) {
        self.state = ReplayState::Seeking;
        debug!(
            from = self.cursor.last_requested_time,
            to = time,
            applied = self.cursor.position,
            "rewinding replay cursor"
        );
        self.cursor.position = 0;
        registry.restore_initial_state(surface);
        self.restore_pending = false;
        self.state = ReplayState::Advancing;
    }
}

impl Default for ReplayEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use netanim_entity::{EntityId, EntityParams, UpdatePayload};

    use crate::surface::NullSurface;
    use crate::surface::recording::RecordingSurface;

    use super::*;

    fn registry_with(ids: &[u32]) -> EntityRegistry {
        let mut registry = EntityRegistry::new();
        for &id in ids {
            registry.get_or_create(EntityId(id), EntityParams::default());
        }
        registry
    }

    fn event(id: u32, time: f64, label: &str) -> UpdateEvent {
        UpdateEvent::new(id, time, UpdatePayload::new(label))
    }

    fn label(registry: &EntityRegistry, id: u32) -> &str {
        registry.get(EntityId(id)).unwrap().label()
    }

    fn engine_with(events: Vec<UpdateEvent>) -> ReplayEngine {
        let mut engine = ReplayEngine::new();
        for e in events {
            engine.ingest(e).unwrap();
        }
        engine
    }

    #[test]
    fn test_empty_engine() {
        let mut engine = ReplayEngine::new();
        let mut registry = registry_with(&[1]);
        assert_eq!(engine.state(), ReplayState::Idle);
        assert!(!engine.advance_to(10.0, &mut registry, &mut NullSurface));
        assert_eq!(engine.next_wake_time(), None);
    }

    #[test]
    fn test_scenario_forward_then_rewind() {
        let mut registry = registry_with(&[1, 2]);
        let mut engine = engine_with(vec![
            event(1, 0.0, "A"),
            event(1, 5.0, "B"),
            event(2, 3.0, "C"),
        ]);

        assert!(engine.advance_to(0.0, &mut registry, &mut NullSurface));
        assert_eq!(label(&registry, 1), "A");
        assert_eq!(engine.next_wake_time(), Some(3.0));

        assert!(engine.advance_to(3.0, &mut registry, &mut NullSurface));
        assert_eq!(label(&registry, 2), "C");
        assert_eq!(engine.next_wake_time(), Some(5.0));

        assert!(engine.advance_to(10.0, &mut registry, &mut NullSurface));
        assert_eq!(label(&registry, 1), "B");
        assert_eq!(engine.next_wake_time(), None);

        assert!(engine.advance_to(2.0, &mut registry, &mut NullSurface));
        assert_eq!(label(&registry, 1), "A");
        assert_eq!(label(&registry, 2), "2");
        assert_eq!(engine.next_wake_time(), Some(3.0));
    }

    #[test]
    fn test_each_event_applied_once_in_order() {
        let mut registry = registry_with(&[1, 2]);
        let mut engine = engine_with(vec![
            event(1, 1.0, "a"),
            event(2, 2.0, "b"),
            event(1, 2.0, "c"),
            event(2, 4.0, "d"),
            event(1, 7.0, "e"),
        ]);
        let mut surface = RecordingSurface::default();

        for t in [0.5, 2.0, 3.0, 4.5, 8.0] {
            engine.advance_to(t, &mut registry, &mut surface);
        }
        let applied: Vec<&str> = surface.updated.iter().map(|(_, l)| l.as_str()).collect();
        assert_eq!(applied, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_repeat_advance_is_noop() {
        let mut registry = registry_with(&[1]);
        let mut engine = engine_with(vec![event(1, 1.0, "a"), event(1, 3.0, "b")]);
        let mut surface = RecordingSurface::default();

        assert!(engine.advance_to(2.0, &mut registry, &mut surface));
        assert!(!engine.advance_to(2.0, &mut registry, &mut surface));
        assert_eq!(surface.updated.len(), 1);
        assert_eq!(engine.cursor().position, 1);
        assert_eq!(engine.next_wake_time(), Some(3.0));
    }

    #[test]
    fn test_boundary_time_is_inclusive() {
        let mut registry = registry_with(&[1]);
        let mut engine = engine_with(vec![event(1, 2.5, "edge")]);
        assert!(engine.advance_to(2.5, &mut registry, &mut NullSurface));
        assert_eq!(label(&registry, 1), "edge");
        assert_eq!(engine.next_wake_time(), None);
    }

    #[test]
    fn test_future_event_not_consumed() {
        let mut registry = registry_with(&[1]);
        let mut engine = engine_with(vec![event(1, 4.0, "later")]);
        assert!(!engine.advance_to(1.0, &mut registry, &mut NullSurface));
        assert_eq!(engine.cursor().position, 0);
        assert_eq!(engine.next_wake_time(), Some(4.0));
        assert_eq!(label(&registry, 1), "1");
    }

    #[test]
    fn test_rewind_reapplies_from_scratch() {
        let mut registry = registry_with(&[1]);
        let mut engine = engine_with(vec![event(1, 1.0, "x"), event(1, 6.0, "y")]);
        let mut surface = RecordingSurface::default();

        engine.advance_to(8.0, &mut registry, &mut surface);
        surface.updated.clear();

        assert!(engine.advance_to(1.0, &mut registry, &mut surface));
        assert_eq!(label(&registry, 1), "x");
        assert_eq!(engine.state(), ReplayState::Advancing);
        // Restore notification, then the replayed event.
        assert_eq!(
            surface.updated,
            vec![(EntityId(1), "1".to_owned()), (EntityId(1), "x".to_owned())]
        );
    }

    #[test]
    fn test_rewind_with_nothing_due_still_reports_update() {
        let mut registry = registry_with(&[1]);
        let mut engine = engine_with(vec![event(1, 5.0, "x")]);
        engine.advance_to(6.0, &mut registry, &mut NullSurface);
        assert!(engine.advance_to(1.0, &mut registry, &mut NullSurface));
        assert_eq!(label(&registry, 1), "1");
        assert_eq!(engine.next_wake_time(), Some(5.0));
    }

    #[test]
    fn test_unknown_entity_is_skipped() {
        let mut registry = registry_with(&[1]);
        let mut engine = engine_with(vec![event(42, 1.0, "ghost"), event(1, 2.0, "real")]);

        assert!(!engine.advance_to(1.0, &mut registry, &mut NullSurface));
        assert_eq!(engine.cursor().position, 1);
        assert_eq!(registry.count(), 1);
        assert!(registry.get(EntityId(42)).is_none());

        assert!(engine.advance_to(2.0, &mut registry, &mut NullSurface));
        assert_eq!(label(&registry, 1), "real");
    }

    #[test]
    fn test_ingest_after_playback_replays_from_start() {
        let mut registry = registry_with(&[1, 2]);
        let mut engine = engine_with(vec![event(1, 1.0, "a"), event(1, 5.0, "b")]);
        engine.advance_to(10.0, &mut registry, &mut NullSurface);

        engine.ingest(event(2, 2.0, "late")).unwrap();
        assert_eq!(engine.cursor().position, 0);
        assert_eq!(engine.cursor().last_requested_time, 0.0);
        assert_eq!(engine.next_wake_time(), Some(1.0));

        assert!(engine.advance_to(3.0, &mut registry, &mut NullSurface));
        assert_eq!(label(&registry, 1), "a");
        assert_eq!(label(&registry, 2), "late");
        assert_eq!(engine.next_wake_time(), Some(5.0));
    }

    #[test]
    fn test_out_of_order_ingest_keeps_ties_stable() {
        let engine = engine_with(vec![
            event(1, 0.0, "a"),
            event(1, 5.0, "b"),
            event(2, 3.0, "c"),
            event(2, 3.0, "d"),
        ]);
        let labels: Vec<&str> = engine
            .events()
            .iter()
            .map(|e| e.payload.label.as_str())
            .collect();
        assert_eq!(labels, vec!["a", "c", "d", "b"]);
    }

    #[test]
    fn test_invalid_times_rejected() {
        let mut engine = ReplayEngine::new();
        assert_eq!(
            engine.ingest(event(1, -1.0, "x")),
            Err(ReplayError::InvalidTime { time: -1.0 })
        );
        assert!(engine.ingest(event(1, f64::INFINITY, "x")).is_err());
        assert!(engine.ingest(event(1, f64::NAN, "x")).is_err());
        assert!(engine.is_empty());
        assert_eq!(engine.state(), ReplayState::Idle);
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut registry = registry_with(&[1]);
        let mut engine = engine_with(vec![event(1, 1.0, "a"), event(1, 2.0, "b")]);
        engine.advance_to(1.0, &mut registry, &mut NullSurface);

        engine.reset();
        assert_eq!(engine.state(), ReplayState::Idle);
        assert!(engine.is_empty());
        assert_eq!(*engine.cursor(), ReplayCursor::default());
        assert_eq!(engine.next_wake_time(), None);
        assert!(!engine.advance_to(5.0, &mut registry, &mut NullSurface));
    }
}
