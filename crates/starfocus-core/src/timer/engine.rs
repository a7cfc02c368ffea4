//! Timer engine implementation.
//!
//! The timer engine is a tick-driven state machine. It owns no clock and
//! no threads - the caller is responsible for calling `tick()` once per
//! elapsed second while the timer runs.
//!
//! ## State Transitions
//!
//! ```text
//! Paused -> Running -> Paused
//!    ^                    |
//!    +--- reset/switch ---+
//! ```
//!
//! Each state exists per mode (`Focus`, `Break`). Reaching zero completes
//! the current mode and switches to the other one, paused.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(ModeDurations::default());
//! engine.start();
//! // Once per second:
//! let transitions = engine.tick(); // Contains TimerCompleted when the mode ends
//! ```

use serde::{Deserialize, Serialize};

use super::display::RenderFrame;
use super::durations::{ModeDurations, TimerMode};
use crate::events::Event;

/// Snapshot of the countdown.
///
/// Invariant: `remaining_secs <= total_secs` and `total_secs > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub remaining_secs: u32,
    pub total_secs: u32,
    pub mode: TimerMode,
    pub running: bool,
}

/// An event together with the state right after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub event: Event,
    pub state: TimerState,
}

/// Core timer engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    durations: ModeDurations,
    state: TimerState,
}

impl TimerEngine {
    /// Create a new engine in paused Focus mode with the full Focus duration.
    pub fn new(durations: ModeDurations) -> Self {
        let total = durations.for_mode(TimerMode::Focus).max(1);
        Self {
            durations,
            state: TimerState {
                remaining_secs: total,
                total_secs: total,
                mode: TimerMode::Focus,
                running: false,
            },
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn mode(&self) -> TimerMode {
        self.state.mode
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn remaining_secs(&self) -> u32 {
        self.state.remaining_secs
    }

    pub fn total_secs(&self) -> u32 {
        self.state.total_secs
    }

    pub fn durations(&self) -> &ModeDurations {
        &self.durations
    }

    /// Build the frame handed to the render callback.
    pub fn frame(&self) -> RenderFrame {
        RenderFrame::from_state(&self.state)
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Transition> {
        if self.state.running {
            return None;
        }
        self.state.running = true;
        Some(self.record(Event::TimerStarted {
            mode: self.state.mode,
            remaining_secs: self.state.remaining_secs,
        }))
    }

    pub fn pause(&mut self) -> Option<Transition> {
        if !self.state.running {
            return None;
        }
        self.state.running = false;
        Some(self.record(Event::TimerPaused {
            remaining_secs: self.state.remaining_secs,
        }))
    }

    pub fn reset(&mut self) -> Transition {
        self.state.running = false;
        self.state.remaining_secs = self.state.total_secs;
        self.record(Event::TimerReset {
            mode: self.state.mode,
            total_secs: self.state.total_secs,
        })
    }

    /// Advance one second. Ticks while paused are ignored.
    ///
    /// Returns `Ticked`, followed by the completion transitions when this
    /// tick consumed the last second.
    pub fn tick(&mut self) -> Vec<Transition> {
        if !self.state.running {
            return Vec::new();
        }
        if self.state.remaining_secs == 0 {
            return self.complete();
        }

        self.state.remaining_secs -= 1;
        let mut transitions = vec![self.record(Event::Ticked {
            remaining_secs: self.state.remaining_secs,
        })];
        if self.state.remaining_secs == 0 {
            transitions.extend(self.complete());
        }
        transitions
    }

    /// Pause, signal completion of the current mode, then switch modes.
    pub fn complete(&mut self) -> Vec<Transition> {
        self.state.running = false;
        let finished = self.record(Event::TimerCompleted {
            mode: self.state.mode,
        });
        vec![finished, self.switch_mode()]
    }

    /// Reset and flip Focus <-> Break, loading the new mode's duration.
    pub fn switch_mode(&mut self) -> Transition {
        self.reset();
        let from = self.state.mode;
        let to = from.flipped();
        let total = self.durations.for_mode(to).max(1);
        self.state.mode = to;
        self.state.total_secs = total;
        self.state.remaining_secs = total;
        self.record(Event::ModeSwitched {
            from,
            to,
            total_secs: total,
        })
    }

    fn record(&self, event: Event) -> Transition {
        Transition {
            event,
            state: self.state,
        }
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(ModeDurations::default())
    }
}
