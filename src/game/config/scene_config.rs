//! Desk Scene Configuration
//!
//! Placement of the camera head on the player body and the desk zones in the
//! room.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::camera::{AcceptanceCone, DeskZone, ZoneId};

/// One desk zone in the scene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoneConfig {
    pub id: u32,
    /// Body yaw range (degrees) that faces the desk; may wrap through 0
    #[serde(default)]
    pub cone: AcceptanceCone,
}

impl ZoneConfig {
    pub fn build(&self) -> DeskZone {
        DeskZone::new(ZoneId(self.id), self.cone)
    }
}

/// Scene layout for the desk room.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Head position relative to the body at rest
    pub head_rest_position: Vec3,
    /// Camera field of view in degrees; `None` when no camera is attached
    pub field_of_view: Option<f32>,
    pub zones: Vec<ZoneConfig>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            head_rest_position: Vec3::new(0.0, 1.6, 0.0),
            field_of_view: Some(60.0),
            zones: vec![ZoneConfig {
                id: 0,
                cone: AcceptanceCone::default(),
            }],
        }
    }
}
