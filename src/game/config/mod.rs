//! Config Module
//!
//! Centralized configuration for the desk scene, camera, movement and journal.
//! Every section has defaults, so a JSON file only needs the values it changes.
//!
//! ```json
//! {
//!   "camera": { "transition_speed": 4.0 },
//!   "journal": { "flip_interval": 0.5, "concurrent_drag": "CancelPrevious" },
//!   "scene": { "zones": [{ "id": 0, "cone": { "min_angle": 330.0, "max_angle": 30.0 } }] }
//! }
//! ```

pub mod journal_config;
pub mod scene_config;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::CameraTuning;
use crate::player::MovementTuning;

pub use journal_config::JournalTuning;
pub use scene_config::{SceneConfig, ZoneConfig};

/// Errors from loading or validating a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub camera: CameraTuning,
    pub movement: MovementTuning,
    pub journal: JournalTuning,
    pub scene: SceneConfig,
}

impl GameConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text)?;
        tracing::info!(
            path = %path.display(),
            zones = config.scene.zones.len(),
            "loaded game config"
        );
        Ok(config)
    }

    /// Parse and validate JSON text.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would stall or invert the state machines.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(name: &str, value: f32) -> Result<(), ConfigError> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")))
            }
        }

        let camera = &self.camera;
        positive("camera.transition_speed", camera.transition_speed)?;
        positive("camera.look.look_smoothing", camera.look.look_smoothing)?;
        positive("camera.return_position_tolerance", camera.return_position_tolerance)?;
        positive("camera.return_pitch_tolerance", camera.return_pitch_tolerance)?;
        positive("camera.return_roll_tolerance", camera.return_roll_tolerance)?;
        if camera.lock_pitch_min >= camera.lock_pitch_max {
            return Err(ConfigError::Invalid(format!(
                "camera lock pitch band is empty: {}..{}",
                camera.lock_pitch_min, camera.lock_pitch_max
            )));
        }

        positive("movement.look.look_smoothing", self.movement.look.look_smoothing)?;
        if self.movement.speed < 0.0 {
            return Err(ConfigError::Invalid("movement.speed must not be negative".into()));
        }

        let journal = &self.journal;
        positive("journal.flip_interval", journal.flip_interval)?;
        positive("journal.focus_animation_speed", journal.focus_animation_speed)?;
        if journal.flip_initial_delay < 0.0 {
            return Err(ConfigError::Invalid(
                "journal.flip_initial_delay must not be negative".into(),
            ));
        }
        if !(0.0..=1.0).contains(&journal.lifted_alpha) {
            return Err(ConfigError::Invalid(format!(
                "journal.lifted_alpha must be within 0..=1, got {}",
                journal.lifted_alpha
            )));
        }

        if let Some(fov) = self.scene.field_of_view {
            positive("scene.field_of_view", fov)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::ConcurrentDragPolicy;

    #[test]
    fn test_empty_object_gives_defaults() {
        let config = GameConfig::from_json("{}").unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.camera.overhead_down_angle, 60.0);
        assert_eq!(config.journal.flip_interval, 0.75);
        assert_eq!(config.scene.zones.len(), 1);
    }

    #[test]
    fn test_partial_override() {
        let config = GameConfig::from_json(
            r#"{
                "camera": { "transition_speed": 4.0 },
                "journal": { "concurrent_drag": "CancelPrevious" },
                "scene": {
                    "zones": [{ "id": 3, "cone": { "min_angle": 330.0, "max_angle": 30.0 } }]
                }
            }"#,
        )
        .unwrap();
        assert_eq!(config.camera.transition_speed, 4.0);
        assert_eq!(config.camera.overhead_forward_offset, 0.3);
        assert_eq!(config.journal.concurrent_drag, ConcurrentDragPolicy::CancelPrevious);
        assert_eq!(config.scene.zones[0].id, 3);
        assert!(config.scene.zones[0].cone.contains(0.0));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let err = GameConfig::from_json(r#"{ "journal": { "flip_interval": 0.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_inverted_pitch_band_rejected() {
        let err = GameConfig::from_json(
            r#"{ "camera": { "lock_pitch_min": 80.0, "lock_pitch_max": 40.0 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(GameConfig::from_json("{ nope"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = GameConfig::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
