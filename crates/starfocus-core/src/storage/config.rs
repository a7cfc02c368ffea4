//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Focus, break and (inert) long-break lengths
//! - Sound effect and ambient music defaults
//! - Starfield density and cursor lag
//!
//! Configuration is stored at `~/.config/starfocus/config.toml`.
//! Loading never writes: a missing file yields defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::audio::{AmbientConfig, DEFAULT_MASTER_GAIN};
use crate::effects::{DEFAULT_RING_LAG_MS, DEFAULT_STAR_COUNT};
use crate::error::ConfigError;
use crate::timer::ModeDurations;

/// Mode lengths in minutes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_focus_minutes")]
    pub focus_minutes: u32,
    #[serde(default = "default_break_minutes")]
    pub break_minutes: u32,
    /// Kept for completeness; no transition uses it.
    #[serde(default = "default_long_break_minutes")]
    pub long_break_minutes: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// UI sounds on at startup.
    #[serde(default)]
    pub sound_effects: bool,
    /// Ambient music on at startup.
    #[serde(default)]
    pub music: bool,
    #[serde(default = "default_master_gain")]
    pub master_gain: f64,
    #[serde(default = "default_chord_probability")]
    pub chord_probability: f64,
    #[serde(default = "default_tinkle_probability")]
    pub tinkle_probability: f64,
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
    #[serde(default = "default_max_interval_ms")]
    pub max_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectsConfig {
    #[serde(default = "default_stars")]
    pub stars: usize,
    #[serde(default = "default_cursor_lag_ms")]
    pub cursor_lag_ms: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/starfocus/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub effects: EffectsConfig,
}

// Default functions
fn default_focus_minutes() -> u32 {
    25
}
fn default_break_minutes() -> u32 {
    5
}
fn default_long_break_minutes() -> u32 {
    15
}
fn default_master_gain() -> f64 {
    DEFAULT_MASTER_GAIN
}
fn default_chord_probability() -> f64 {
    AmbientConfig::default().chord_probability
}
fn default_tinkle_probability() -> f64 {
    AmbientConfig::default().tinkle_probability
}
fn default_min_interval_ms() -> u64 {
    AmbientConfig::default().min_interval_ms
}
fn default_max_interval_ms() -> u64 {
    AmbientConfig::default().max_interval_ms
}
fn default_stars() -> usize {
    DEFAULT_STAR_COUNT
}
fn default_cursor_lag_ms() -> u64 {
    DEFAULT_RING_LAG_MS
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            focus_minutes: default_focus_minutes(),
            break_minutes: default_break_minutes(),
            long_break_minutes: default_long_break_minutes(),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sound_effects: false,
            music: false,
            master_gain: default_master_gain(),
            chord_probability: default_chord_probability(),
            tinkle_probability: default_tinkle_probability(),
            min_interval_ms: default_min_interval_ms(),
            max_interval_ms: default_max_interval_ms(),
        }
    }
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            stars: default_stars(),
            cursor_lag_ms: default_cursor_lag_ms(),
        }
    }
}

impl AudioConfig {
    pub fn ambient(&self) -> AmbientConfig {
        AmbientConfig {
            chord_probability: self.chord_probability,
            tinkle_probability: self.tinkle_probability,
            min_interval_ms: self.min_interval_ms,
            max_interval_ms: self.max_interval_ms,
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let (parent_path, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        if let Some(parent) = parent_path {
            for part in parent.split('.') {
                current = current.get_mut(part).ok_or_else(unknown)?;
            }
        }

        let obj = current.as_object_mut().ok_or_else(unknown)?;
        let existing = obj.get(leaf).ok_or_else(unknown)?;

        let new_value = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|e| invalid(e.to_string()))?,
            ),
            serde_json::Value::Number(_) => {
                if let Ok(n) = value.parse::<u64>() {
                    serde_json::Value::Number(n.into())
                } else if let Ok(n) = value.parse::<f64>() {
                    serde_json::Number::from_f64(n)
                        .map(serde_json::Value::Number)
                        .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                } else {
                    return Err(invalid(format!("cannot parse '{value}' as number")));
                }
            }
            serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                return Err(invalid("cannot set a whole section".into()));
            }
            _ => serde_json::Value::String(value.into()),
        };

        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    /// Default location of the config file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, or return defaults if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed
    /// or holds invalid values.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, or return defaults if the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }
        };
        let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_err = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_err(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_err(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_err(e.to_string()))?;
        Ok(())
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.durations()?;
        for (key, p) in [
            ("audio.chord_probability", self.audio.chord_probability),
            ("audio.tinkle_probability", self.audio.tinkle_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::InvalidValue {
                    key: key.into(),
                    message: format!("probability {p} is outside 0..=1"),
                });
            }
        }
        if !(0.0..=1.0).contains(&self.audio.master_gain) {
            return Err(ConfigError::InvalidValue {
                key: "audio.master_gain".into(),
                message: "gain must be within 0..=1".into(),
            });
        }
        if self.audio.max_interval_ms < self.audio.min_interval_ms {
            return Err(ConfigError::InvalidValue {
                key: "audio.max_interval_ms".into(),
                message: "must not be below audio.min_interval_ms".into(),
            });
        }
        Ok(())
    }

    pub fn durations(&self) -> Result<ModeDurations, ConfigError> {
        ModeDurations::from_minutes(
            self.timer.focus_minutes,
            self.timer.break_minutes,
            self.timer.long_break_minutes,
        )
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key in memory. Returns error if the key is
    /// unknown or the resulting config is invalid. Call `save` to persist.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}
