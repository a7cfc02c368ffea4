//! Shared output bus. Applies the master gain and swallows sink failures.

use tracing::debug;

use super::sink::AudioSink;
use super::tone::Tone;

/// Default master level for every voice on the bus.
pub const DEFAULT_MASTER_GAIN: f64 = 0.3;

pub struct MixBus {
    sink: Box<dyn AudioSink>,
    master_gain: f32,
}

impl MixBus {
    pub fn new(sink: Box<dyn AudioSink>, master_gain: f64) -> Self {
        Self {
            sink,
            master_gain: master_gain.clamp(0.0, 1.0) as f32,
        }
    }

    /// Forward a user gesture to the sink. Returns whether output is usable.
    pub fn resume(&mut self) -> bool {
        match self.sink.resume() {
            Ok(()) => true,
            Err(e) => {
                debug!(error = %e, "audio resume failed");
                false
            }
        }
    }

    /// Play one voice at the master level. Failures are logged and dropped:
    /// a missing or blocked output never reaches the caller.
    pub fn play(&mut self, tone: &Tone) -> bool {
        let mixed = Tone {
            gain: tone.gain.scaled(self.master_gain),
            ..tone.clone()
        };
        match self.sink.play(&mixed) {
            Ok(()) => true,
            Err(e) => {
                debug!(error = %e, hz = tone.start_hz(), "audio tone skipped");
                false
            }
        }
    }
}

impl std::fmt::Debug for MixBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MixBus")
            .field("master_gain", &self.master_gain)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::sink::{MemorySink, SilentSink};
    use crate::audio::tone::{Automation, Waveform};

    fn tone(gain: f32) -> Tone {
        Tone {
            waveform: Waveform::Triangle,
            frequency: Automation::starting_at(220.0),
            gain: Automation::starting_at(gain),
            lowpass_hz: Some(500.0),
            duration_secs: 1.0,
        }
    }

    #[test]
    fn applies_master_gain() {
        let sink = MemorySink::new();
        let mut bus = MixBus::new(Box::new(sink.clone()), 0.5);
        assert!(bus.play(&tone(0.2)));
        let played = sink.played();
        assert!((played[0].peak_gain() - 0.1).abs() < 1e-6);
        assert_eq!(played[0].lowpass_hz, Some(500.0));
    }

    #[test]
    fn failures_are_swallowed() {
        let mut bus = MixBus::new(Box::new(SilentSink), DEFAULT_MASTER_GAIN);
        assert!(!bus.play(&tone(0.2)));
        assert!(!bus.resume());
    }
}
