//! One running timer session.
//!
//! A [`Session`] is the single owned instance a host constructs at startup
//! and passes by `&mut` into its input handlers. It sequences every side
//! effect of a state change in the same order: mutate, render, then audio.
//!
//! Deferred work lives on the session's [`TaskQueue`]. The host decides what
//! time it is and calls [`Session::advance_to`]; tests do the same with
//! virtual milliseconds.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::audio::{AmbientScheduler, AmbientTick, AudioSink, MixBus, UiSound, UiSoundEffects};
use crate::clock::{TaskHandle, TaskQueue};
use crate::effects::{CursorTrail, PointerPos};
use crate::error::CoreError;
use crate::events::Event;
use crate::storage::Config;
use crate::timer::{RenderFrame, TimerEngine, TimerState, Transition};

/// Tick period while the countdown runs.
pub const TICK_MS: u64 = 1_000;

/// Presentation callback. Invoked once after every state mutation.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame);
}

impl<F> Renderer for F
where
    F: FnMut(&RenderFrame),
{
    fn render(&mut self, frame: &RenderFrame) {
        self(frame)
    }
}

/// The four user actions a host can forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    ToggleRunning,
    Reset,
    SwitchMode,
    ToggleAudio,
}

/// Payload of a queued session task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTask {
    Tick,
    Ambient,
}

impl From<AmbientTick> for SessionTask {
    fn from(_: AmbientTick) -> Self {
        SessionTask::Ambient
    }
}

pub struct Session<R: Rng> {
    engine: TimerEngine,
    queue: TaskQueue<SessionTask>,
    tick_pending: Option<TaskHandle>,
    sfx: UiSoundEffects,
    ambient: AmbientScheduler,
    bus: MixBus,
    cursor: CursorTrail,
    renderer: Box<dyn Renderer>,
    rng: R,
}

impl<R: Rng> Session<R> {
    /// Build a session from configuration and render the first frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration holds invalid values.
    pub fn new(
        config: &Config,
        renderer: Box<dyn Renderer>,
        sink: Box<dyn AudioSink>,
        rng: R,
    ) -> Result<Self, CoreError> {
        config.validate()?;
        let mut session = Self {
            engine: TimerEngine::new(config.durations()?),
            queue: TaskQueue::new(),
            tick_pending: None,
            sfx: UiSoundEffects::new(config.audio.sound_effects),
            ambient: AmbientScheduler::new(config.audio.ambient()),
            bus: MixBus::new(sink, config.audio.master_gain),
            cursor: CursorTrail::new(config.effects.cursor_lag_ms),
            renderer,
            rng,
        };
        session.render();
        if config.audio.music {
            session.set_music(true);
        }
        Ok(session)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.engine.state()
    }

    pub fn frame(&self) -> RenderFrame {
        self.engine.frame()
    }

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn sound_effects_enabled(&self) -> bool {
        self.sfx.enabled()
    }

    pub fn music_enabled(&self) -> bool {
        self.ambient.enabled()
    }

    pub fn now_ms(&self) -> u64 {
        self.queue.now_ms()
    }

    pub fn cursor(&self) -> &CursorTrail {
        &self.cursor
    }

    /// When the host should next call [`advance_to`](Self::advance_to).
    pub fn next_due_ms(&self) -> Option<u64> {
        self.queue.next_due_ms()
    }

    /// Number of queued tasks (tick and ambient firing).
    pub fn pending_tasks(&self) -> usize {
        self.queue.len()
    }

    // ── Input ────────────────────────────────────────────────────────

    /// Dispatch a user action. Button presses click first, like the
    /// physical controls they stand in for.
    pub fn handle(&mut self, action: Action) -> Vec<Event> {
        debug!(?action, "user action");
        match action {
            Action::ToggleRunning => {
                self.click();
                self.toggle_running()
            }
            Action::Reset => {
                self.click();
                vec![self.reset()]
            }
            Action::SwitchMode => {
                self.click();
                vec![self.switch_mode()]
            }
            Action::ToggleAudio => {
                self.toggle_audio();
                Vec::new()
            }
        }
    }

    pub fn toggle_running(&mut self) -> Vec<Event> {
        let event = if self.engine.is_running() {
            self.pause()
        } else {
            self.start()
        };
        event.into_iter().collect()
    }

    // ── Timer ────────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        let transition = self.engine.start()?;
        self.arm_tick();
        Some(self.emit(transition))
    }

    pub fn pause(&mut self) -> Option<Event> {
        let transition = self.engine.pause()?;
        self.disarm_tick();
        Some(self.emit(transition))
    }

    pub fn reset(&mut self) -> Event {
        self.disarm_tick();
        let transition = self.engine.reset();
        self.emit(transition)
    }

    pub fn switch_mode(&mut self) -> Event {
        self.disarm_tick();
        let transition = self.engine.switch_mode();
        self.emit(transition)
    }

    // ── Audio ────────────────────────────────────────────────────────

    /// The combined speaker toggle: treats the press as the user gesture
    /// that unblocks output, then turns music and sound effects on together,
    /// or off together when both are already on.
    pub fn toggle_audio(&mut self) -> bool {
        self.bus.resume();
        let on = !(self.sfx.enabled() && self.ambient.enabled());
        self.set_music(on);
        self.sfx.set_enabled(on);
        if on {
            self.click();
        }
        on
    }

    pub fn toggle_music(&mut self) -> bool {
        self.bus.resume();
        let on = !self.ambient.enabled();
        self.set_music(on);
        on
    }

    pub fn toggle_sound_effects(&mut self) -> bool {
        self.sfx.toggle()
    }

    fn set_music(&mut self, on: bool) {
        if on {
            self.ambient.enable(&mut self.queue, &mut self.rng, &mut self.bus);
        } else {
            self.ambient.disable(&mut self.queue);
        }
    }

    // ── Pointer ──────────────────────────────────────────────────────

    /// Move the cursor dot now. The ring follows after the configured lag.
    pub fn pointer_moved(&mut self, x: f32, y: f32) -> PointerPos {
        self.cursor.pointer_moved(self.queue.now_ms(), x, y);
        self.cursor.dot()
    }

    pub fn set_hover(&mut self, hover: bool) {
        self.cursor.set_hover(hover);
    }

    // ── Time ─────────────────────────────────────────────────────────

    /// Run every task due at or before `now_ms`, in deadline order.
    pub fn advance_to(&mut self, now_ms: u64) -> Vec<Event> {
        self.cursor.advance_to(now_ms);
        let mut events = Vec::new();
        while let Some((handle, task)) = self.queue.pop_due(now_ms) {
            match task {
                SessionTask::Tick => events.extend(self.on_tick(handle)),
                SessionTask::Ambient => {
                    self.ambient.fire(handle, &mut self.queue, &mut self.rng, &mut self.bus);
                }
            }
        }
        events
    }

    fn on_tick(&mut self, handle: TaskHandle) -> Vec<Event> {
        if self.tick_pending != Some(handle) {
            trace!(?handle, "stale tick dropped");
            return Vec::new();
        }
        self.tick_pending = None;

        let events = self
            .engine
            .tick()
            .into_iter()
            .map(|t| self.emit(t))
            .collect();
        if self.engine.is_running() {
            self.arm_tick();
        }
        events
    }

    fn arm_tick(&mut self) {
        self.disarm_tick();
        self.tick_pending = Some(self.queue.schedule_after(TICK_MS, SessionTask::Tick));
    }

    fn disarm_tick(&mut self) {
        if let Some(handle) = self.tick_pending.take() {
            self.queue.cancel(handle);
        }
    }

    // ── Side effects ─────────────────────────────────────────────────

    /// Render the state after `transition`, then play its audio cue.
    fn emit(&mut self, transition: Transition) -> Event {
        self.renderer.render(&RenderFrame::from_state(&transition.state));
        match transition.event {
            Event::TimerStarted { .. } => {
                self.sfx.play(UiSound::Start, &mut self.bus);
            }
            Event::TimerCompleted { mode } => {
                debug!(?mode, "mode finished");
                self.sfx.play(UiSound::Finish, &mut self.bus);
            }
            _ => {}
        }
        transition.event
    }

    fn render(&mut self) {
        let frame = self.engine.frame();
        self.renderer.render(&frame);
    }

    fn click(&mut self) {
        self.sfx.play(UiSound::Click, &mut self.bus);
    }
}

impl<R: Rng> std::fmt::Debug for Session<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("engine", &self.engine)
            .field("tick_pending", &self.tick_pending)
            .field("sfx", &self.sfx)
            .field("ambient", &self.ambient)
            .field("bus", &self.bus)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::MemorySink;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Frames = Rc<RefCell<Vec<RenderFrame>>>;

    fn session(config: &Config) -> (Session<Pcg64Mcg>, Frames, MemorySink) {
        let frames: Frames = Rc::default();
        let sink = MemorySink::new();
        let recorder = frames.clone();
        let session = Session::new(
            config,
            Box::new(move |f: &RenderFrame| recorder.borrow_mut().push(f.clone())),
            Box::new(sink.clone()),
            Pcg64Mcg::seed_from_u64(11),
        )
        .unwrap();
        (session, frames, sink)
    }

    #[test]
    fn renders_initial_frame() {
        let (_, frames, _) = session(&Config::default());
        let frames = frames.borrow();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].clock, "25:00");
        assert_eq!(frames[0].mode_label, "FOCUS");
    }

    #[test]
    fn start_arms_one_tick_per_second() {
        let (mut s, frames, _) = session(&Config::default());
        s.start();
        assert_eq!(s.next_due_ms(), Some(1_000));
        s.advance_to(3_000);
        assert_eq!(s.state().remaining_secs, 1497);
        assert_eq!(frames.borrow().last().unwrap().clock, "24:57");
    }

    #[test]
    fn pause_cancels_pending_tick() {
        let (mut s, _, _) = session(&Config::default());
        s.start();
        s.advance_to(1_500);
        s.pause();
        assert_eq!(s.pending_tasks(), 0);
        assert!(s.advance_to(10_000).is_empty());
        assert_eq!(s.state().remaining_secs, 1499);
    }

    #[test]
    fn restart_does_not_double_tick() {
        let (mut s, _, _) = session(&Config::default());
        s.start();
        s.pause();
        s.start();
        s.advance_to(1_000);
        assert_eq!(s.state().remaining_secs, 1499);
    }

    #[test]
    fn toggle_audio_turns_both_on_then_off() {
        let (mut s, _, sink) = session(&Config::default());
        assert!(s.toggle_audio());
        assert!(s.music_enabled());
        assert!(s.sound_effects_enabled());
        // Opening chord plus the confirming click.
        assert_eq!(sink.len(), 4);

        assert!(!s.toggle_audio());
        assert!(!s.music_enabled());
        assert!(!s.sound_effects_enabled());
        assert_eq!(s.pending_tasks(), 0);
    }

    #[test]
    fn cursor_ring_uses_configured_lag() {
        let mut config = Config::default();
        config.effects.cursor_lag_ms = 200;
        let (mut s, _, _) = session(&config);
        s.pointer_moved(5.0, 6.0);
        s.advance_to(199);
        assert_eq!(s.cursor().ring(), PointerPos::default());
        s.advance_to(200);
        assert_eq!(s.cursor().ring(), PointerPos { x: 5.0, y: 6.0 });
        assert_eq!(s.cursor().dot(), PointerPos { x: 5.0, y: 6.0 });
    }

    #[test]
    fn hover_reaches_cursor() {
        let (mut s, _, _) = session(&Config::default());
        s.set_hover(true);
        assert!(s.cursor().hover());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = Config::default();
        config.timer.break_minutes = 0;
        let result = Session::new(
            &config,
            Box::new(|_: &RenderFrame| {}),
            Box::new(MemorySink::new()),
            Pcg64Mcg::seed_from_u64(0),
        );
        assert!(result.is_err());
    }
}
