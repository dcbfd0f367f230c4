//! Key bindings and loop configuration
//!
//! Stored as JSON. Every field has a default, so partial files are fine.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::TICK_RATE_HZ;
use crate::error::SettingsError;
use crate::input::{KeyCode, keys};

/// Key codes the simulation reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Controls {
    pub move_left: KeyCode,
    pub move_right: KeyCode,
    pub jump: KeyCode,
    /// Switch to handgun
    pub handgun_mode: KeyCode,
    /// Switch to machine gun
    pub machine_gun_mode: KeyCode,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            move_left: keys::A,
            move_right: keys::D,
            jump: keys::SPACE,
            handgun_mode: keys::DIGIT_1,
            machine_gun_mode: keys::DIGIT_2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub controls: Controls,
    /// Simulation ticks per second
    pub tick_rate_hz: u32,
    /// Bound of the UI -> simulation event queue
    pub input_queue_capacity: usize,
    /// Seed for machine-gun scatter
    pub rng_seed: u64,
    /// How long the first frame may take to render before the loop goes on
    pub first_frame_timeout_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            controls: Controls::default(),
            tick_rate_hz: TICK_RATE_HZ,
            input_queue_capacity: 256,
            rng_seed: 0x5eed_5eed,
            first_frame_timeout_ms: 2000,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self =
            serde_json::from_str(&json).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Like `load`, but falls back to defaults (with a warning) on any error
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Self::default();
        };
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{}, using default settings", e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.tick_rate_hz == 0 {
            return Err(SettingsError::ZeroTickRate);
        }
        if self.input_queue_capacity == 0 {
            return Err(SettingsError::ZeroQueueCapacity);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_settings(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_controls() {
        let controls = Controls::default();
        assert_eq!(controls.move_left, 65);
        assert_eq!(controls.move_right, 68);
        assert_eq!(controls.jump, 32);
        assert_eq!(controls.handgun_mode, 49);
        assert_eq!(controls.machine_gun_mode, 50);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_settings(r#"{ "rng_seed": 7, "controls": { "jump": 87 } }"#);
        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.rng_seed, 7);
        assert_eq!(settings.controls.jump, 87);
        assert_eq!(settings.controls.move_left, keys::A);
        assert_eq!(settings.tick_rate_hz, TICK_RATE_HZ);
    }

    #[test]
    fn test_zero_tick_rate_rejected() {
        let file = write_settings(r#"{ "tick_rate_hz": 0 }"#);
        assert!(matches!(
            Settings::load(file.path()),
            Err(SettingsError::ZeroTickRate)
        ));
    }

    #[test]
    fn test_unparsable_file_reports_path() {
        let file = write_settings("not json");
        let err = Settings::load(file.path()).unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn test_load_or_default_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert_eq!(Settings::load_or_default(Some(&missing)), Settings::default());
        assert_eq!(Settings::load_or_default(None), Settings::default());
    }
}
