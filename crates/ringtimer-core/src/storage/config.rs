//! TOML-based application configuration.
//!
//! Stores defaults only:
//! - Standard timer duration
//! - Gym interval durations and rounds
//! - Wheel picker geometry and settle delay
//! - Countdown engine tuning
//! - Cue preferences
//!
//! Configuration is stored at `~/.config/ringtimer/config.toml`. Running
//! countdowns are never written here.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{ConfigError, CoreError, Result, ValidationError};
use crate::picker::{WheelGeometry, MAX_MINUTES, MAX_SECONDS};
use crate::session::StandardSelection;
use crate::timer::{CountdownEngine, GymConfig, DEFAULT_FINISH_EPSILON_SECS, MAX_ROUNDS};

/// Longest duration a two-column picker can produce.
const MAX_PICKER_SECS: u32 = MAX_MINUTES * 60 + MAX_SECONDS;

/// Wheel picker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickerConfig {
    #[serde(default = "default_item_height")]
    pub item_height: f64,
    #[serde(default = "default_viewport_height")]
    pub viewport_height: f64,
    /// Quiet period after the last scroll before the wheel snaps.
    #[serde(default = "default_settle_quiet_ms")]
    pub settle_quiet_ms: u64,
}

/// Countdown engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_finish_epsilon_secs")]
    pub finish_epsilon_secs: f64,
    /// Host frame interval; the terminal has no display refresh to follow.
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
}

/// Cue configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CuesConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Ring the terminal bell on cues.
    #[serde(default = "default_true")]
    pub bell: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/ringtimer/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: StandardSelection,
    #[serde(default)]
    pub gym: GymConfig,
    #[serde(default)]
    pub picker: PickerConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub cues: CuesConfig,
}

// Default functions
fn default_item_height() -> f64 {
    crate::picker::DEFAULT_ITEM_HEIGHT
}
fn default_viewport_height() -> f64 {
    crate::picker::DEFAULT_VIEWPORT_HEIGHT
}
fn default_settle_quiet_ms() -> u64 {
    crate::picker::DEFAULT_SETTLE_QUIET.as_millis() as u64
}
fn default_finish_epsilon_secs() -> f64 {
    DEFAULT_FINISH_EPSILON_SECS
}
fn default_frame_interval_ms() -> u64 {
    16
}
fn default_true() -> bool {
    true
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            item_height: default_item_height(),
            viewport_height: default_viewport_height(),
            settle_quiet_ms: default_settle_quiet_ms(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            finish_epsilon_secs: default_finish_epsilon_secs(),
            frame_interval_ms: default_frame_interval_ms(),
        }
    }
}

impl Default for CuesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bell: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timer: StandardSelection::default(),
            gym: GymConfig::default(),
            picker: PickerConfig::default(),
            engine: EngineConfig::default(),
            cues: CuesConfig::default(),
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

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
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
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default location of the config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be created.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, or write and return the defaults when
    /// no file exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed, or if the
    /// default config cannot be written.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Same as [`Config::load`] for an explicit path.
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let load_failed = |message: String| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message,
                };
                let cfg: Config =
                    toml::from_str(&content).map_err(|e| load_failed(e.to_string()))?;
                cfg.validate().map_err(|e| load_failed(e.to_string()))?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
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

    /// Check that every duration and count is one the pickers could produce
    /// and that the wheel geometry can tell items apart.
    ///
    /// # Errors
    ///
    /// [`ValidationError::OutOfRange`] naming the first offending key, or
    /// [`ConfigError::InvalidValue`] for unusable wheel geometry.
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("timer.minutes", self.timer.minutes, 0, MAX_MINUTES),
            ("timer.seconds", self.timer.seconds, 0, MAX_SECONDS),
            ("gym.prep_sec", self.gym.prep_sec, 0, MAX_PICKER_SECS),
            ("gym.work_sec", self.gym.work_sec, 0, MAX_PICKER_SECS),
            ("gym.rest_sec", self.gym.rest_sec, 0, MAX_PICKER_SECS),
            ("gym.rounds", self.gym.rounds, 1, MAX_ROUNDS),
        ];
        for (field, value, min, max) in checks {
            if value < min || value > max {
                return Err(ValidationError::OutOfRange {
                    field: field.to_string(),
                    value,
                    min,
                    max,
                }
                .into());
            }
        }

        let geometry = self.wheel_geometry();
        if !(geometry.item_height.is_finite() && geometry.item_height > 0.0) {
            return Err(ConfigError::InvalidValue {
                key: "picker.item_height".into(),
                message: format!("must be greater than zero, got {}", geometry.item_height),
            }
            .into());
        }
        if !(geometry.viewport_height.is_finite()
            && geometry.viewport_height >= geometry.item_height)
        {
            return Err(ConfigError::InvalidValue {
                key: "picker.viewport_height".into(),
                message: format!(
                    "must be at least picker.item_height ({}), got {}",
                    geometry.item_height, geometry.viewport_height
                ),
            }
            .into());
        }
        Ok(())
    }

    /// Set a config value by dot-separated key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value does not fit the
    /// field's type, or the result is out of range.
    pub fn update(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| {
            CoreError::from(ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.update(key, value)?;
        self.save()
    }

    pub fn wheel_geometry(&self) -> WheelGeometry {
        WheelGeometry {
            item_height: self.picker.item_height,
            viewport_height: self.picker.viewport_height,
        }
    }

    pub fn settle_quiet(&self) -> Duration {
        Duration::from_millis(self.picker.settle_quiet_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.engine.frame_interval_ms.max(1))
    }

    pub fn countdown_engine(&self) -> CountdownEngine {
        CountdownEngine::with_finish_epsilon(self.engine.finish_epsilon_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.gym, GymConfig::default());
        assert_eq!(parsed.timer.total_secs(), 30);
        assert_eq!(parsed.picker.settle_quiet_ms, 120);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[gym]\nrounds = 8\n").unwrap();
        assert_eq!(parsed.gym.rounds, 8);
        assert_eq!(parsed.gym.work_sec, 30);
        assert_eq!(parsed.engine.frame_interval_ms, 16);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("gym.work_sec").as_deref(), Some("30"));
        assert_eq!(cfg.get("cues.bell").as_deref(), Some("true"));
        assert!(cfg.get("gym.missing_key").is_none());
    }

    #[test]
    fn set_json_value_by_path_updates_nested_number() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        Config::set_json_value_by_path(&mut json, "gym.rest_sec", "45").unwrap();
        assert_eq!(
            Config::get_json_value_by_path(&json, "gym.rest_sec").unwrap(),
            &serde_json::Value::Number(45.into())
        );
    }

    #[test]
    fn set_json_value_by_path_rejects_unknown_key() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        let result = Config::set_json_value_by_path(&mut json, "gym.nonexistent_key", "1");
        assert!(matches!(result, Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_json_value_by_path_rejects_invalid_type() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        let result = Config::set_json_value_by_path(&mut json, "cues.enabled", "not_a_bool");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn update_rejects_fractional_rounds() {
        let mut cfg = Config::default();
        assert!(cfg.update("gym.rounds", "1.5").is_err());
        assert_eq!(cfg.gym.rounds, 3);
        cfg.update("picker.item_height", "96").unwrap();
        assert_eq!(cfg.wheel_geometry().item_height, 96.0);
    }

    #[test]
    fn update_rejects_values_no_picker_can_produce() {
        let mut cfg = Config::default();
        let err = cfg.update("gym.rounds", "0").unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::OutOfRange { ref field, .. }) if field == "gym.rounds"
        ));
        assert!(cfg.update("timer.seconds", "75").is_err());
        assert_eq!(cfg.gym.rounds, 3);
        assert_eq!(cfg.timer.seconds, 30);
        cfg.update("gym.work_sec", "3599").unwrap();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn update_rejects_degenerate_wheel_geometry() {
        let mut cfg = Config::default();
        let err = cfg.update("picker.item_height", "0").unwrap_err();
        assert!(matches!(
            err,
            CoreError::Config(ConfigError::InvalidValue { ref key, .. }) if key == "picker.item_height"
        ));
        assert!(cfg.update("picker.viewport_height", "64").is_err());
        assert_eq!(cfg.picker.item_height, 128.0);
        assert_eq!(cfg.picker.viewport_height, 520.0);
    }

    #[test]
    fn load_from_rejects_out_of_range_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[timer]\nminutes = 100000000\n").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        match err {
            CoreError::Config(ConfigError::LoadFailed { message, .. }) => {
                assert!(message.contains("timer.minutes"), "message was {message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.gym, GymConfig::default());
        assert!(path.exists());
    }

    #[test]
    fn save_then_load_preserves_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.update("timer.minutes", "2").unwrap();
        cfg.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.timer.total_secs(), 150);
    }

    #[test]
    fn broken_file_reports_load_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "gym = 3 = 4").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::LoadFailed { .. })));
    }
}
