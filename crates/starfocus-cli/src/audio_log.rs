//! Audio sink for terminals: every voice becomes a log line.

use starfocus_core::audio::{AudioSink, Tone};
use starfocus_core::AudioError;
use tracing::info;

/// Logs each tone at `info` on the `starfocus::audio` target.
#[derive(Debug, Default)]
pub struct LogSink {
    voices: u64,
}

impl AudioSink for LogSink {
    fn play(&mut self, tone: &Tone) -> Result<(), AudioError> {
        self.voices += 1;
        info!(
            target: "starfocus::audio",
            voice = self.voices,
            waveform = ?tone.waveform,
            hz = tone.start_hz(),
            peak = tone.peak_gain(),
            secs = tone.duration_secs,
            "tone"
        );
        Ok(())
    }
}
