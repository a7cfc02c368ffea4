//! Backend-neutral description of one transient voice.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Triangle,
}

/// How a parameter travels from the previous point to this one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ramp {
    /// Jump to the value at `at_secs`.
    Set,
    Linear,
    Exponential,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AutomationPoint {
    pub at_secs: f32,
    pub value: f32,
    pub ramp: Ramp,
}

/// Piecewise parameter curve, relative to the voice's start.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Automation {
    pub points: Vec<AutomationPoint>,
}

impl Automation {
    pub fn starting_at(value: f32) -> Self {
        Self {
            points: vec![AutomationPoint {
                at_secs: 0.0,
                value,
                ramp: Ramp::Set,
            }],
        }
    }

    pub fn set_at(self, value: f32, at_secs: f32) -> Self {
        self.push(value, at_secs, Ramp::Set)
    }

    pub fn linear_to(self, value: f32, at_secs: f32) -> Self {
        self.push(value, at_secs, Ramp::Linear)
    }

    pub fn exponential_to(self, value: f32, at_secs: f32) -> Self {
        self.push(value, at_secs, Ramp::Exponential)
    }

    fn push(mut self, value: f32, at_secs: f32, ramp: Ramp) -> Self {
        self.points.push(AutomationPoint { at_secs, value, ramp });
        self
    }

    pub fn initial(&self) -> f32 {
        self.points.first().map(|p| p.value).unwrap_or(0.0)
    }

    pub fn peak(&self) -> f32 {
        self.points.iter().map(|p| p.value).fold(0.0, f32::max)
    }

    /// Multiply every point, e.g. to apply a master gain.
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            points: self
                .points
                .iter()
                .map(|p| AutomationPoint {
                    value: p.value * factor,
                    ..*p
                })
                .collect(),
        }
    }
}

/// A request to render one voice: oscillator, optional low-pass, gain
/// envelope. The sink owns the voice for `duration_secs` and then
/// releases it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tone {
    pub waveform: Waveform,
    pub frequency: Automation,
    pub gain: Automation,
    #[serde(default)]
    pub lowpass_hz: Option<f32>,
    pub duration_secs: f32,
}

impl Tone {
    pub fn start_hz(&self) -> f32 {
        self.frequency.initial()
    }

    pub fn peak_gain(&self) -> f32 {
        self.gain.peak()
    }
}
