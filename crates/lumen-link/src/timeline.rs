//! The pausable program clock.
//!
//! The timeline governs when compiled instructions take visual effect on
//! the remote controller; it is distinct from wall-clock time. Elapsed time
//! accumulates monotonically across pause/resume cycles and resets only on
//! stop. Transitions take `now` explicitly, so the state machine is pure
//! with respect to the wall clock.

use std::time::{Duration, Instant};

/// Timeline lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimelineState {
    #[default]
    Stopped,
    Running,
    Paused,
}

/// Single-owner timeline state. Only the conductor mutates it; everyone
/// composing a timeline-control payload reads it.
#[derive(Debug, Clone)]
pub struct Timeline {
    state: TimelineState,
    anchor: Option<Instant>,
    accumulated: Duration,
    index: u8,
}

impl Timeline {
    /// A stopped main timeline (index 0).
    pub fn new() -> Self {
        Self::with_index(0)
    }

    /// A stopped timeline with an explicit wire index (low nibble only).
    pub fn with_index(index: u8) -> Self {
        Self {
            state: TimelineState::Stopped,
            anchor: None,
            accumulated: Duration::ZERO,
            index,
        }
    }

    pub fn state(&self) -> TimelineState {
        self.state
    }

    /// Index carried in the control bitfield's low nibble.
    pub fn index(&self) -> u8 {
        self.index
    }

    /// Paused bit as it goes on the wire: anything not running is paused.
    pub fn paused_flag(&self) -> bool {
        self.state != TimelineState::Running
    }

    /// Begin (or resume) running at `now`. Returns true when the call
    /// actually transitioned; starting a running timeline is a no-op.
    /// Accumulated time survives a pause and clears only from stopped.
    pub fn start(&mut self, now: Instant) -> bool {
        match self.state {
            TimelineState::Running => false,
            TimelineState::Stopped => {
                self.accumulated = Duration::ZERO;
                self.anchor = Some(now);
                self.state = TimelineState::Running;
                true
            }
            TimelineState::Paused => {
                self.anchor = Some(now);
                self.state = TimelineState::Running;
                true
            }
        }
    }

    /// Fold the running span into the accumulator and pause. Returns true
    /// when the call actually transitioned.
    pub fn pause(&mut self, now: Instant) -> bool {
        if self.state != TimelineState::Running {
            return false;
        }
        if let Some(anchor) = self.anchor.take() {
            self.accumulated += now.saturating_duration_since(anchor);
        }
        self.state = TimelineState::Paused;
        true
    }

    /// Unconditional reset to zero elapsed, stopped.
    pub fn stop(&mut self) {
        self.state = TimelineState::Stopped;
        self.anchor = None;
        self.accumulated = Duration::ZERO;
    }

    /// Elapsed program time at `now`. Pure read; never emits.
    pub fn elapsed(&self, now: Instant) -> Duration {
        match (self.state, self.anchor) {
            (TimelineState::Running, Some(anchor)) => {
                self.accumulated + now.saturating_duration_since(anchor)
            }
            _ => self.accumulated,
        }
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}
