//! Discrete UI sounds.

use serde::{Deserialize, Serialize};

use super::bus::MixBus;
use super::tone::{Automation, Tone, Waveform};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UiSound {
    Click,
    Start,
    Finish,
}

impl UiSound {
    pub const ALL: [UiSound; 3] = [UiSound::Click, UiSound::Start, UiSound::Finish];

    /// Fixed rendering parameters for each kind.
    pub fn tone(self) -> Tone {
        match self {
            UiSound::Click => Tone {
                waveform: Waveform::Sine,
                frequency: Automation::starting_at(600.0).exponential_to(1000.0, 0.1),
                gain: Automation::starting_at(0.3).exponential_to(0.001, 0.15),
                lowpass_hz: None,
                duration_secs: 0.15,
            },
            UiSound::Start => Tone {
                waveform: Waveform::Sine,
                frequency: Automation::starting_at(440.0).exponential_to(880.0, 0.3),
                gain: Automation::starting_at(0.3).linear_to(0.0, 0.3),
                lowpass_hz: None,
                duration_secs: 0.3,
            },
            UiSound::Finish => Tone {
                waveform: Waveform::Sine,
                frequency: Automation::starting_at(880.0).set_at(1108.0, 0.2),
                gain: Automation::starting_at(0.3).linear_to(0.0, 1.5),
                lowpass_hz: None,
                duration_secs: 1.5,
            },
        }
    }
}

/// On/off switch in front of the UI sounds. Holds no other state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiSoundEffects {
    enabled: bool,
}

impl UiSoundEffects {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Flip and return the new setting.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    /// Returns whether a tone reached the sink.
    pub fn play(&self, kind: UiSound, bus: &mut MixBus) -> bool {
        if !self.enabled {
            return false;
        }
        bus.play(&kind.tone())
    }
}
