//! Generative ambient loop.
//!
//! While enabled, each firing independently rolls for a pad chord and a
//! tinkle, then re-arms itself after a random delay. Voices are fire and
//! forget: nothing waits on a previous firing and voices may overlap.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::bus::MixBus;
use super::tone::{Automation, Tone, Waveform};
use crate::clock::{TaskHandle, TaskQueue};

/// Dm9 voicing the pad chord draws from (D3 F3 A3 C4 E4).
pub const CHORD_NOTES: [f32; 5] = [146.83, 174.61, 220.00, 261.63, 329.63];

/// High pentatonic set for tinkles.
pub const TINKLE_NOTES: [f32; 6] = [523.25, 587.33, 659.25, 783.99, 880.00, 1046.50];

pub const CHORD_SIZE: usize = 3;
pub const CHORD_PEAK_GAIN: f32 = 0.05;
pub const TINKLE_PEAK_GAIN: f32 = 0.02;
const ENVELOPE_FLOOR: f32 = 0.001;
const TINKLE_ATTACK_SECS: f32 = 0.1;
const TINKLE_DURATION_SECS: f32 = 3.0;

/// Marker payload for a scheduled ambient firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmbientTick;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmbientConfig {
    pub chord_probability: f64,
    pub tinkle_probability: f64,
    pub min_interval_ms: u64,
    pub max_interval_ms: u64,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            chord_probability: 0.4,
            tinkle_probability: 0.6,
            min_interval_ms: 4_000,
            max_interval_ms: 6_000,
        }
    }
}

impl AmbientConfig {
    /// Uniform delay in `[min_interval_ms, max_interval_ms)`.
    pub fn next_delay_ms<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        if self.max_interval_ms <= self.min_interval_ms {
            return self.min_interval_ms;
        }
        rng.gen_range(self.min_interval_ms..self.max_interval_ms)
    }
}

/// What one firing emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AmbientFiring {
    pub chord: bool,
    pub tinkle: bool,
}

/// Build the voices of one pad chord: three distinct notes, each a
/// filtered triangle with a slow attack and long exponential release.
pub fn chord_voices<R: Rng + ?Sized>(rng: &mut R) -> Vec<Tone> {
    let notes: Vec<f32> = CHORD_NOTES.choose_multiple(rng, CHORD_SIZE).copied().collect();
    notes
        .into_iter()
        .map(|hz| {
            let cutoff = rng.gen_range(400.0..600.0);
            let attack = rng.gen_range(2.0..4.0);
            let release = rng.gen_range(4.0..7.0);
            let tail = attack + release;
            Tone {
                waveform: Waveform::Triangle,
                frequency: Automation::starting_at(hz),
                gain: Automation::starting_at(0.0)
                    .linear_to(CHORD_PEAK_GAIN, attack)
                    .exponential_to(ENVELOPE_FLOOR, tail),
                lowpass_hz: Some(cutoff),
                duration_secs: tail + 1.0,
            }
        })
        .collect()
}

/// Build one short sine tinkle from the pentatonic set.
pub fn tinkle_voice<R: Rng + ?Sized>(rng: &mut R) -> Tone {
    let hz = TINKLE_NOTES.choose(rng).copied().unwrap_or(TINKLE_NOTES[0]);
    Tone {
        waveform: Waveform::Sine,
        frequency: Automation::starting_at(hz),
        gain: Automation::starting_at(0.0)
            .linear_to(TINKLE_PEAK_GAIN, TINKLE_ATTACK_SECS)
            .exponential_to(ENVELOPE_FLOOR, TINKLE_DURATION_SECS),
        lowpass_hz: None,
        duration_secs: TINKLE_DURATION_SECS,
    }
}

/// On/off ambient loop. Owns the handle of its pending firing exclusively.
#[derive(Debug, Clone)]
pub struct AmbientScheduler {
    config: AmbientConfig,
    enabled: bool,
    pending: Option<TaskHandle>,
}

impl AmbientScheduler {
    pub fn new(config: AmbientConfig) -> Self {
        Self {
            config,
            enabled: false,
            pending: None,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Start the loop: one chord right away, then the first firing is armed.
    /// Returns `false` if it was already running.
    pub fn enable<T, R>(&mut self, queue: &mut TaskQueue<T>, rng: &mut R, bus: &mut MixBus) -> bool
    where
        T: From<AmbientTick>,
        R: Rng + ?Sized,
    {
        if self.enabled {
            return false;
        }
        self.enabled = true;
        play_chord(rng, bus);
        self.arm(queue, rng);
        true
    }

    /// Stop the loop and cancel the pending firing. Returns `false` if it was
    /// already stopped.
    pub fn disable<T>(&mut self, queue: &mut TaskQueue<T>) -> bool {
        if let Some(handle) = self.pending.take() {
            queue.cancel(handle);
        }
        let was_enabled = self.enabled;
        self.enabled = false;
        was_enabled
    }

    /// Handle a firing popped from the queue.
    ///
    /// Returns `None` without side effects when the handle is not the one
    /// this scheduler is waiting on, e.g. it was disabled in the meantime.
    pub fn fire<T, R>(
        &mut self,
        handle: TaskHandle,
        queue: &mut TaskQueue<T>,
        rng: &mut R,
        bus: &mut MixBus,
    ) -> Option<AmbientFiring>
    where
        T: From<AmbientTick>,
        R: Rng + ?Sized,
    {
        if !self.enabled || self.pending != Some(handle) {
            trace!(?handle, "stale ambient firing dropped");
            return None;
        }
        self.pending = None;

        let mut firing = AmbientFiring::default();
        if rng.gen_bool(self.config.chord_probability.clamp(0.0, 1.0)) {
            play_chord(rng, bus);
            firing.chord = true;
        }
        if rng.gen_bool(self.config.tinkle_probability.clamp(0.0, 1.0)) {
            bus.play(&tinkle_voice(rng));
            firing.tinkle = true;
        }
        self.arm(queue, rng);
        Some(firing)
    }

    fn arm<T, R>(&mut self, queue: &mut TaskQueue<T>, rng: &mut R)
    where
        T: From<AmbientTick>,
        R: Rng + ?Sized,
    {
        let delay = self.config.next_delay_ms(rng);
        self.pending = Some(queue.schedule_after(delay, T::from(AmbientTick)));
    }
}

fn play_chord<R: Rng + ?Sized>(rng: &mut R, bus: &mut MixBus) {
    for voice in chord_voices(rng) {
        bus.play(&voice);
    }
}
