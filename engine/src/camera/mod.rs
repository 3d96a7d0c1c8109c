//! Camera Module
//!
//! Desk-aware first-person camera: a head rig that blends between free look,
//! a locked overhead pose above a desk, a return blend and lateral look-around
//! poses. This module is window-system agnostic - it only deals with camera
//! state and math.

pub mod angles;
pub mod desk_camera;
pub mod desk_zone;

pub use angles::{
    angle_in_range, delta_angle, lerp, lerp_angle, normalize_degrees, restrict_angle,
    smoothing_factor,
};
pub use desk_camera::{
    CameraFrame, CameraLens, CameraState, CameraTuning, DeskCameraRig, HeadPose,
    TransitionSignals, next_state,
};
pub use desk_zone::{AcceptanceCone, DeskZone, PlayerId, ZoneEvent, ZoneId};
