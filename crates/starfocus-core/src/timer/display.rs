//! Presentation values derived from timer state.

use serde::{Deserialize, Serialize};

use super::durations::TimerMode;
use super::engine::TimerState;

/// Radius of the circular progress ring, in view units.
pub const RING_RADIUS: f64 = 140.0;

/// Full stroke length of the progress ring (~879.6).
pub fn ring_circumference() -> f64 {
    2.0 * std::f64::consts::PI * RING_RADIUS
}

/// `MM:SS`, both fields zero-padded to two digits. Minutes are not clamped.
pub fn format_clock(remaining_secs: u32) -> String {
    format!("{:02}:{:02}", remaining_secs / 60, remaining_secs % 60)
}

/// Stroke offset of the ring: 0 when full, the circumference when empty.
pub fn progress_offset(remaining_secs: u32, total_secs: u32) -> f64 {
    let circumference = ring_circumference();
    if total_secs == 0 {
        return circumference;
    }
    let fraction = remaining_secs as f64 / total_secs as f64;
    circumference * (1.0 - fraction)
}

/// Everything the view layer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub clock: String,
    pub mode_label: String,
    pub mode: TimerMode,
    pub progress_offset: f64,
    pub circumference: f64,
    pub remaining_secs: u32,
    pub total_secs: u32,
    pub running: bool,
}

impl RenderFrame {
    pub fn from_state(state: &TimerState) -> Self {
        Self {
            clock: format_clock(state.remaining_secs),
            mode_label: state.mode.label().to_string(),
            mode: state.mode,
            progress_offset: progress_offset(state.remaining_secs, state.total_secs),
            circumference: ring_circumference(),
            remaining_secs: state.remaining_secs,
            total_secs: state.total_secs,
            running: state.running,
        }
    }
}
