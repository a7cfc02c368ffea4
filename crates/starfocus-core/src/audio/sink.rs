//! The audio output capability the core depends on.

use std::cell::RefCell;
use std::rc::Rc;

use super::tone::Tone;
use crate::error::AudioError;

/// Anything that can render a [`Tone`].
///
/// Implementations own nothing beyond the transient voices they are handed.
/// Every call may fail; callers treat failure as "no sound".
pub trait AudioSink {
    /// Unblock output after a user gesture. Most backends need nothing.
    fn resume(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    fn play(&mut self, tone: &Tone) -> Result<(), AudioError>;
}

/// A sink with no backend. Every request fails with `Unavailable`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSink;

impl AudioSink for SilentSink {
    fn resume(&mut self) -> Result<(), AudioError> {
        Err(AudioError::Unavailable)
    }

    fn play(&mut self, _tone: &Tone) -> Result<(), AudioError> {
        Err(AudioError::Unavailable)
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    played: Vec<Tone>,
    suspended: bool,
    unavailable: bool,
}

/// Records every tone it accepts. Clones share the same recording, so a
/// caller can keep one handle while a session owns another.
///
/// A sink created with [`MemorySink::suspended`] rejects tones until
/// `resume` is called, like a browser-style output waiting for a gesture.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    inner: Rc<RefCell<MemoryInner>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn suspended() -> Self {
        let sink = Self::default();
        sink.inner.borrow_mut().suspended = true;
        sink
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.borrow_mut().unavailable = unavailable;
    }

    pub fn played(&self) -> Vec<Tone> {
        self.inner.borrow().played.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().played.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.inner.borrow_mut().played.clear();
    }
}

impl AudioSink for MemorySink {
    fn resume(&mut self) -> Result<(), AudioError> {
        let mut inner = self.inner.borrow_mut();
        if inner.unavailable {
            return Err(AudioError::Unavailable);
        }
        inner.suspended = false;
        Ok(())
    }

    fn play(&mut self, tone: &Tone) -> Result<(), AudioError> {
        let mut inner = self.inner.borrow_mut();
        if inner.unavailable {
            return Err(AudioError::Unavailable);
        }
        if inner.suspended {
            return Err(AudioError::Suspended);
        }
        inner.played.push(tone.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::tone::{Automation, Waveform};

    fn beep() -> Tone {
        Tone {
            waveform: Waveform::Sine,
            frequency: Automation::starting_at(440.0),
            gain: Automation::starting_at(0.1),
            lowpass_hz: None,
            duration_secs: 0.1,
        }
    }

    #[test]
    fn memory_sink_clones_share_recording() {
        let sink = MemorySink::new();
        let mut owned = sink.clone();
        owned.play(&beep()).unwrap();
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn suspended_sink_needs_resume() {
        let mut sink = MemorySink::suspended();
        assert_eq!(sink.play(&beep()), Err(AudioError::Suspended));
        sink.resume().unwrap();
        assert!(sink.play(&beep()).is_ok());
    }

    #[test]
    fn silent_sink_is_unavailable() {
        let mut sink = SilentSink;
        assert_eq!(sink.play(&beep()), Err(AudioError::Unavailable));
        assert_eq!(sink.resume(), Err(AudioError::Unavailable));
    }
}
