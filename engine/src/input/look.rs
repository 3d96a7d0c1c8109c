//! Look Delta Accumulation
//!
//! Handles captured mouse input with delta accumulation for first-person look.
//! Raw motion events can arrive several times per frame; they accumulate here
//! and are consumed once per frame into [`FrameInput::look`](super::FrameInput).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Default look rotation speed (degrees per unit of smoothed look input)
pub const ROTATION_SPEED: f32 = 2.0;

/// Default look smoothing rate (per second)
pub const LOOK_SMOOTHING: f32 = 5.0;

/// Shared look tuning for body yaw and head pitch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookTuning {
    /// Degrees turned per unit of smoothed look input per frame
    pub rotation_speed: f32,
    /// Rate at which the turn speed chases the raw input
    pub look_smoothing: f32,
}

impl Default for LookTuning {
    fn default() -> Self {
        Self {
            rotation_speed: ROTATION_SPEED,
            look_smoothing: LOOK_SMOOTHING,
        }
    }
}

/// Look-delta accumulator.
///
/// # Example
///
/// ```rust,ignore
/// let mut look = LookAccumulator::new();
///
/// // In event loop: accumulate raw motion
/// look.accumulate(0.5, -0.25);
/// look.accumulate(0.25, 0.0);
///
/// // Once per frame: consume into the frame snapshot
/// let frame = FrameInput::new(dt).with_look(look.consume());
/// ```
#[derive(Debug, Clone, Default)]
pub struct LookAccumulator {
    delta: Vec2,
    /// Whether the cursor is captured (hidden and confined)
    captured: bool,
}

impl LookAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate raw look motion. Ignored while the cursor is released.
    #[inline]
    pub fn accumulate(&mut self, dx: f32, dy: f32) {
        if self.captured {
            self.delta += Vec2::new(dx, dy);
        }
    }

    /// Return the accumulated delta and reset it to zero.
    #[inline]
    pub fn consume(&mut self) -> Vec2 {
        std::mem::take(&mut self.delta)
    }

    /// Capture or release the cursor. Releasing drops any pending delta.
    pub fn set_captured(&mut self, captured: bool) {
        self.captured = captured;
        if !captured {
            self.delta = Vec2::ZERO;
        }
    }

    #[inline]
    pub fn is_captured(&self) -> bool {
        self.captured
    }
}
