mod display;
mod durations;
mod engine;

pub use display::{format_clock, progress_offset, ring_circumference, RenderFrame, RING_RADIUS};
pub use durations::{ModeDurations, TimerMode};
pub use engine::{TimerEngine, TimerState, Transition};
