//! Input Module
//!
//! Platform-agnostic per-frame input. The host translates device events into a
//! [`FrameInput`] once per frame; nothing in the engine polls devices.

pub mod look;

use glam::Vec2;

pub use look::{LOOK_SMOOTHING, LookAccumulator, LookTuning, ROTATION_SPEED};

/// Everything the engine needs from the host for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Elapsed time since the previous frame, in seconds
    pub dt: f32,
    /// Raw movement axes: x = strafe (right positive), y = forward
    pub movement: Vec2,
    /// Look axes: x = horizontal (right positive), y = vertical (up positive)
    pub look: Vec2,
}

impl FrameInput {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            ..Default::default()
        }
    }

    pub fn with_movement(mut self, movement: Vec2) -> Self {
        self.movement = movement;
        self
    }

    pub fn with_look(mut self, look: Vec2) -> Self {
        self.look = look;
        self
    }
}
