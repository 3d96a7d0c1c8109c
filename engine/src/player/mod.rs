//! Player Module
//!
//! Provides the first-person body: yaw from horizontal look and
//! camera-relative planar movement.

pub mod body;

pub use body::{FirstPersonBody, MovementTuning, WALK_SPEED};
