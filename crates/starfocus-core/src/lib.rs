//! # starfocus Core Library
//!
//! This library provides the core logic for the starfocus focus/break timer.
//! Hosts (the bundled terminal CLI, or any other view layer) own a single
//! [`Session`] and feed it user actions and the current time.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A tick-driven state machine that requires the caller
//!   to invoke `tick()` once per elapsed second
//! - **Task Queue**: Virtual-time scheduling with cancellable handles for
//!   ticks, ambient firings and cursor catch-up
//! - **Audio**: Backend-neutral tones, a shared mixing bus, UI sounds and a
//!   generative ambient loop
//! - **Effects**: Starfield backdrop and cursor trail
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`Session`]: Owned instance wiring engine, queue, audio and renderer
//! - [`AudioSink`]: Trait for audio backends
//! - [`Config`]: Application configuration management

pub mod audio;
pub mod clock;
pub mod effects;
pub mod error;
pub mod events;
pub mod session;
pub mod storage;
pub mod timer;

pub use audio::{AmbientScheduler, AudioSink, MemorySink, MixBus, SilentSink, Tone, UiSound};
pub use clock::{TaskHandle, TaskQueue};
pub use effects::{CursorTrail, Starfield};
pub use error::{AudioError, ConfigError, CoreError};
pub use events::Event;
pub use session::{Action, Renderer, Session};
pub use storage::Config;
pub use timer::{ModeDurations, RenderFrame, TimerEngine, TimerMode, TimerState};
