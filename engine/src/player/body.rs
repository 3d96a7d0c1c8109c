//! First-Person Body
//!
//! The body owns the player's yaw and planar movement. Horizontal look turns
//! the body every frame regardless of what the head rig is doing; the head
//! only ever adds pitch and roll on top.
//!
//! # Usage
//!
//! ```rust,ignore
//! let mut body = FirstPersonBody::new(MovementTuning::default());
//!
//! // Each frame:
//! let velocity = body.update(&frame_input);
//! character.simple_move(velocity);
//! ```

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::camera::angles::{lerp, normalize_degrees, smoothing_factor};
use crate::input::{FrameInput, LookTuning};

/// Walk speed in units per second
pub const WALK_SPEED: f32 = 10.0;

/// Movement tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementTuning {
    /// Planar speed in units per second
    pub speed: f32,
    /// Yaw speed and smoothing
    pub look: LookTuning,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            speed: WALK_SPEED,
            look: LookTuning::default(),
        }
    }
}

/// Player body with smoothed yaw and camera-relative movement.
#[derive(Debug, Clone)]
pub struct FirstPersonBody {
    /// Facing in degrees, `[0, 360)`. 0 faces +Z, 90 faces +X.
    yaw: f32,
    /// Smoothed yaw speed (degrees per frame)
    yaw_speed: f32,
    /// Planar velocity from the most recent update
    velocity: Vec3,
    pub tuning: MovementTuning,
}

impl Default for FirstPersonBody {
    fn default() -> Self {
        Self::new(MovementTuning::default())
    }
}

impl FirstPersonBody {
    pub fn new(tuning: MovementTuning) -> Self {
        Self {
            yaw: 0.0,
            yaw_speed: 0.0,
            velocity: Vec3::ZERO,
            tuning,
        }
    }

    /// Create a body already facing `yaw` degrees.
    pub fn facing(yaw: f32, tuning: MovementTuning) -> Self {
        Self {
            yaw: normalize_degrees(yaw),
            ..Self::new(tuning)
        }
    }

    #[inline]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    #[inline]
    pub fn set_yaw(&mut self, yaw: f32) {
        self.yaw = normalize_degrees(yaw);
    }

    #[inline]
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Body rotation around +Y.
    #[inline]
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw.to_radians())
    }

    /// Turn the body and compute this frame's planar velocity.
    ///
    /// Movement axes are normalized, so diagonal input is not faster.
    pub fn update(&mut self, input: &FrameInput) -> Vec3 {
        let look = self.tuning.look;
        self.yaw_speed = lerp(
            self.yaw_speed,
            input.look.x * look.rotation_speed,
            smoothing_factor(input.dt, look.look_smoothing),
        );
        self.yaw = normalize_degrees(self.yaw + self.yaw_speed);

        let local = Vec3::new(input.movement.x, 0.0, input.movement.y);
        self.velocity = (self.rotation() * local).normalize_or_zero() * self.tuning.speed;
        self.velocity
    }
}
