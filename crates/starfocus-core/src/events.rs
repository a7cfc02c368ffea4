use serde::{Deserialize, Serialize};

use crate::timer::TimerMode;

/// Every timer state change produces an Event.
/// The session renders once per event and derives audio cues from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        remaining_secs: u32,
    },
    TimerPaused {
        remaining_secs: u32,
    },
    TimerReset {
        mode: TimerMode,
        total_secs: u32,
    },
    Ticked {
        remaining_secs: u32,
    },
    /// The countdown reached zero. Carries the mode that just finished.
    TimerCompleted {
        mode: TimerMode,
    },
    ModeSwitched {
        from: TimerMode,
        to: TimerMode,
        total_secs: u32,
    },
}
