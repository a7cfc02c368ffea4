use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    Focus,
    Break,
}

impl TimerMode {
    /// The mode a switch leads to.
    pub fn flipped(self) -> Self {
        match self {
            TimerMode::Focus => TimerMode::Break,
            TimerMode::Break => TimerMode::Focus,
        }
    }

    /// Label shown next to the clock.
    pub fn label(self) -> &'static str {
        match self {
            TimerMode::Focus => "FOCUS",
            TimerMode::Break => "BREAK TIME",
        }
    }
}

/// Configured length of each mode, in seconds.
///
/// `long_break_secs` is carried as configuration only. The two-mode toggle
/// never reaches it and nothing counts cycles to trigger it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeDurations {
    pub focus_secs: u32,
    pub break_secs: u32,
    pub long_break_secs: u32,
}

impl ModeDurations {
    /// Build from minute values, rejecting zero-length modes.
    ///
    /// Uses saturating arithmetic so absurd minute counts clamp rather than wrap.
    pub fn from_minutes(focus: u32, brk: u32, long_break: u32) -> Result<Self, ConfigError> {
        let durations = Self {
            focus_secs: focus.saturating_mul(60),
            break_secs: brk.saturating_mul(60),
            long_break_secs: long_break.saturating_mul(60),
        };
        durations.validate()?;
        Ok(durations)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, secs) in [
            ("timer.focus_minutes", self.focus_secs),
            ("timer.break_minutes", self.break_secs),
            ("timer.long_break_minutes", self.long_break_secs),
        ] {
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    key: key.into(),
                    message: "duration must be greater than zero".into(),
                });
            }
        }
        Ok(())
    }

    pub fn for_mode(&self, mode: TimerMode) -> u32 {
        match mode {
            TimerMode::Focus => self.focus_secs,
            TimerMode::Break => self.break_secs,
        }
    }
}

impl Default for ModeDurations {
    fn default() -> Self {
        Self {
            focus_secs: 25 * 60,
            break_secs: 5 * 60,
            long_break_secs: 15 * 60,
        }
    }
}
