//! Desk Camera Rig
//!
//! Head rig for the first-person player. The body owns yaw; the rig owns the
//! head's local pose (position, pitch, roll) and the lens field of view.
//!
//! ## States
//!
//! ```text
//!            zone entry + facing + pitch band
//!   Free ───────────────────────────────────▶ LockedOverhead
//!    ▲                                             │ zone exit / look up / yaw drift
//!    │ pose back at rest                           ▼
//!    └──────────────────────────────────────── ReturnFree
//!
//!   Free ◀──▶ LockAroundLeft / LockAroundRight   (explicit setters only)
//! ```
//!
//! Transitions are decided by [`next_state`], a pure function of the current
//! state and the frame's [`TransitionSignals`]. Blends are exponential:
//! every frame moves a fraction `dt * transition_speed` of the remaining
//! distance, and angles blend along the shortest arc.
//!
//! ## Pitch convention
//!
//! Pitch is in degrees, positive looking down, kept in `(-180, 180]`.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use static_assertions::const_assert;

use super::angles::{
    delta_angle, lerp, lerp_angle, normalize_degrees, restrict_angle, signed_degrees,
    smoothing_factor,
};
use super::desk_zone::AcceptanceCone;
use crate::input::LookTuning;

/// Lower bound (exclusive) of the head pitch that can lock onto a desk
pub const LOCK_PITCH_MIN: f32 = 35.0;
/// Upper bound (exclusive) of the head pitch that can lock onto a desk
pub const LOCK_PITCH_MAX: f32 = 90.0;
/// Free-look pitch limit in either direction
pub const FREE_PITCH_LIMIT: f32 = 85.0;

const_assert!(LOCK_PITCH_MIN < LOCK_PITCH_MAX);
const_assert!(FREE_PITCH_LIMIT > LOCK_PITCH_MIN);

/// Active camera state. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CameraState {
    #[default]
    Free,
    LockedOverhead,
    ReturnFree,
    LockAroundLeft,
    LockAroundRight,
}

/// Camera tuning, in degrees, seconds and local head units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraTuning {
    /// Free-look pitch speed and smoothing
    pub look: LookTuning,
    /// Blend rate for every pose transition (per second)
    pub transition_speed: f32,
    /// Forward lean applied over a desk
    pub overhead_forward_offset: f32,
    /// Pitch held while looking down at a desk
    pub overhead_down_angle: f32,
    /// Roll applied while looking around a corner
    pub look_around_tilt_angle: f32,
    /// Sideways head offset while looking around a corner
    pub look_around_side_offset: f32,
    /// Free-look pitch clamp (symmetric)
    pub free_pitch_limit: f32,
    /// Exclusive pitch band that can lock onto a desk
    pub lock_pitch_min: f32,
    pub lock_pitch_max: f32,
    /// Integrated upward look input that releases the desk lock
    pub exit_look_threshold: f32,
    /// Body yaw drift from the entry angle that releases the desk lock
    pub exit_yaw_tolerance: f32,
    /// Rest-pose tolerances for finishing the return blend
    pub return_position_tolerance: f32,
    pub return_pitch_tolerance: f32,
    pub return_roll_tolerance: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            look: LookTuning::default(),
            transition_speed: 3.0,
            overhead_forward_offset: 0.3,
            overhead_down_angle: 60.0,
            look_around_tilt_angle: 15.0,
            look_around_side_offset: 0.2,
            free_pitch_limit: FREE_PITCH_LIMIT,
            lock_pitch_min: LOCK_PITCH_MIN,
            lock_pitch_max: LOCK_PITCH_MAX,
            exit_look_threshold: 0.1,
            exit_yaw_tolerance: 20.0,
            return_position_tolerance: 0.1,
            return_pitch_tolerance: 5.0,
            return_roll_tolerance: 0.1,
        }
    }
}

/// Local pose of the camera head relative to the body.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HeadPose {
    pub position: Vec3,
    /// Degrees, positive looking down
    pub pitch: f32,
    /// Degrees, positive tilting left
    pub roll: f32,
}

impl HeadPose {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
}

/// Field of view and the value it relaxes back to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraLens {
    pub fov: f32,
    pub rest_fov: f32,
}

impl CameraLens {
    pub fn new(fov: f32) -> Self {
        Self { fov, rest_fov: fov }
    }
}

/// Per-frame facts that can move the state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransitionSignals {
    /// The player left a desk zone this frame
    pub zone_exited: bool,
    /// Player inside a zone, facing it, with the head pitched into the lock band
    pub entry_qualified: bool,
    /// Integrated upward look passed the release threshold
    pub look_exceeded: bool,
    /// Body yaw drifted too far from the entry angle
    pub yaw_drifted: bool,
    /// Head pose is back within rest tolerances
    pub rest_converged: bool,
}

/// Pure transition function.
///
/// A zone exit always wins over an entry in the same frame.
pub fn next_state(current: CameraState, signals: &TransitionSignals) -> CameraState {
    match current {
        CameraState::LockedOverhead
            if signals.zone_exited || signals.look_exceeded || signals.yaw_drifted =>
        {
            CameraState::ReturnFree
        }
        CameraState::Free if signals.entry_qualified && !signals.zone_exited => {
            CameraState::LockedOverhead
        }
        CameraState::ReturnFree if signals.rest_converged => CameraState::Free,
        other => other,
    }
}

/// Host-supplied facts for one camera tick.
#[derive(Debug, Clone, Copy)]
pub struct CameraFrame<'a> {
    /// Seconds since the previous frame
    pub dt: f32,
    /// Look axes (x horizontal, y vertical up positive)
    pub look: Vec2,
    /// Body yaw after this frame's turn, degrees
    pub body_yaw: f32,
    /// A zone reported an exit this frame
    pub zone_exited: bool,
    /// Cones of the zones the player is currently inside
    pub occupied_cones: &'a [AcceptanceCone],
}

/// Desk-aware head rig.
#[derive(Debug, Clone)]
pub struct DeskCameraRig {
    state: CameraState,
    /// Current local head pose
    pub head: HeadPose,
    /// Local head position the rig relaxes back to
    rest_position: Vec3,
    /// Missing when the host has no camera attached; FOV blending is skipped
    lens: Option<CameraLens>,
    /// Smoothed free-look pitch speed
    pitch_speed: f32,
    /// Integrated vertical look input while locked overhead
    look_integrator: f32,
    /// Body yaw at the moment the overhead lock engaged
    entry_yaw: f32,
    /// Most recent body yaw seen by the rig
    last_body_yaw: f32,
    pub tuning: CameraTuning,
}

impl DeskCameraRig {
    /// Create a rig resting at `rest_position`.
    ///
    /// `fov` is `None` when no camera is attached; the rig still runs but
    /// skips field-of-view blending.
    pub fn new(rest_position: Vec3, fov: Option<f32>, tuning: CameraTuning) -> Self {
        if fov.is_none() {
            tracing::warn!("desk camera has no lens attached; field-of-view blending disabled");
        }
        Self {
            state: CameraState::Free,
            head: HeadPose::at(rest_position),
            rest_position,
            lens: fov.map(CameraLens::new),
            pitch_speed: 0.0,
            look_integrator: 0.0,
            entry_yaw: 0.0,
            last_body_yaw: 0.0,
            tuning,
        }
    }

    #[inline]
    pub fn state(&self) -> CameraState {
        self.state
    }

    #[inline]
    pub fn rest_position(&self) -> Vec3 {
        self.rest_position
    }

    #[inline]
    pub fn fov(&self) -> Option<f32> {
        self.lens.map(|lens| lens.fov)
    }

    /// Override the current field of view (e.g. a zoom effect); it blends back.
    pub fn set_fov(&mut self, fov: f32) {
        if let Some(lens) = self.lens.as_mut() {
            lens.fov = fov;
        }
    }

    #[inline]
    pub fn look_integrator(&self) -> f32 {
        self.look_integrator
    }

    #[inline]
    pub fn entry_yaw(&self) -> f32 {
        self.entry_yaw
    }

    // ------------------------------------------------------------------
    // Explicit state setters
    // ------------------------------------------------------------------

    pub fn set_free(&mut self) {
        self.state = CameraState::Free;
    }

    /// Lock onto a desk, remembering the current body yaw as the entry angle.
    pub fn set_locked_overhead(&mut self) {
        self.state = CameraState::LockedOverhead;
        self.look_integrator = 0.0;
        self.pitch_speed = 0.0;
        self.entry_yaw = self.last_body_yaw;
    }

    pub fn set_return_free(&mut self) {
        self.state = CameraState::ReturnFree;
    }

    pub fn set_look_around_left(&mut self) {
        self.state = CameraState::LockAroundLeft;
    }

    pub fn set_look_around_right(&mut self) {
        self.state = CameraState::LockAroundRight;
    }

    fn enter(&mut self, state: CameraState) {
        if state == self.state {
            return;
        }
        tracing::debug!(from = ?self.state, to = ?state, "camera state change");
        match state {
            CameraState::Free => self.set_free(),
            CameraState::LockedOverhead => self.set_locked_overhead(),
            CameraState::ReturnFree => self.set_return_free(),
            CameraState::LockAroundLeft => self.set_look_around_left(),
            CameraState::LockAroundRight => self.set_look_around_right(),
        }
    }

    // ------------------------------------------------------------------
    // Per-frame update
    // ------------------------------------------------------------------

    /// Whether the head pitch sits inside the band that can lock onto a desk.
    pub fn pitch_in_lock_band(&self) -> bool {
        let pitch = normalize_degrees(self.head.pitch);
        pitch > self.tuning.lock_pitch_min && pitch < self.tuning.lock_pitch_max
    }

    /// Whether the head pose is back within rest tolerances.
    pub fn is_at_rest(&self) -> bool {
        self.head.position.distance(self.rest_position) < self.tuning.return_position_tolerance
            && delta_angle(self.head.pitch, 0.0).abs() < self.tuning.return_pitch_tolerance
            && delta_angle(self.head.roll, 0.0).abs() < self.tuning.return_roll_tolerance
    }

    /// Advance one frame. Returns `(from, to)` when the state changed.
    pub fn tick(&mut self, frame: &CameraFrame<'_>) -> Option<(CameraState, CameraState)> {
        let before = self.state;
        self.last_body_yaw = frame.body_yaw;

        let mut signals = TransitionSignals {
            zone_exited: frame.zone_exited,
            ..Default::default()
        };

        if self.state == CameraState::LockedOverhead {
            self.look_integrator += frame.dt * frame.look.y;
            signals.look_exceeded = self.look_integrator > self.tuning.exit_look_threshold;
            signals.yaw_drifted =
                delta_angle(frame.body_yaw, self.entry_yaw).abs() > self.tuning.exit_yaw_tolerance;
        }

        if self.state == CameraState::Free && !frame.zone_exited {
            signals.entry_qualified = self.pitch_in_lock_band()
                && frame
                    .occupied_cones
                    .iter()
                    .any(|cone| cone.contains(frame.body_yaw));
        }

        self.enter(next_state(self.state, &signals));
        self.blend(frame.dt, frame.look.y);

        if self.state == CameraState::ReturnFree && self.is_at_rest() {
            let converged = TransitionSignals {
                rest_converged: true,
                ..Default::default()
            };
            self.enter(next_state(self.state, &converged));
        }

        (before != self.state).then_some((before, self.state))
    }

    fn blend(&mut self, dt: f32, look_y: f32) {
        let t = smoothing_factor(dt, self.tuning.transition_speed);

        match self.state {
            CameraState::Free => {
                let look = self.tuning.look;
                self.pitch_speed = lerp(
                    self.pitch_speed,
                    look_y * look.rotation_speed,
                    smoothing_factor(dt, look.look_smoothing),
                );
                let limit = self.tuning.free_pitch_limit;
                self.head.pitch = restrict_angle(self.head.pitch - self.pitch_speed, -limit, limit);
                self.blend_position(self.rest_position, t);
            }
            CameraState::LockedOverhead => {
                let target =
                    self.rest_position + Vec3::new(0.0, 0.0, self.tuning.overhead_forward_offset);
                self.blend_position(target, t);
                self.blend_angles(self.tuning.overhead_down_angle, 0.0, t);
            }
            CameraState::ReturnFree => {
                self.blend_position(self.rest_position, t);
                self.blend_angles(0.0, 0.0, t);
            }
            CameraState::LockAroundLeft | CameraState::LockAroundRight => {
                let left = self.state == CameraState::LockAroundLeft;
                let side = if left {
                    -self.tuning.look_around_side_offset
                } else {
                    self.tuning.look_around_side_offset
                };
                let tilt = if left {
                    self.tuning.look_around_tilt_angle
                } else {
                    -self.tuning.look_around_tilt_angle
                };
                self.blend_position(self.rest_position + Vec3::new(side, 0.0, 0.0), t);
                self.blend_angles(0.0, tilt, t);
            }
        }

        if let Some(lens) = self.lens.as_mut() {
            lens.fov = lerp(lens.fov, lens.rest_fov, t);
        }
    }

    #[inline]
    fn blend_position(&mut self, target: Vec3, t: f32) {
        self.head.position = self.head.position.lerp(target, t);
    }

    #[inline]
    fn blend_angles(&mut self, pitch: f32, roll: f32, t: f32) {
        self.head.pitch = signed_degrees(lerp_angle(self.head.pitch, pitch, t));
        self.head.roll = signed_degrees(lerp_angle(self.head.roll, roll, t));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn frame<'a>(cones: &'a [AcceptanceCone], body_yaw: f32) -> CameraFrame<'a> {
        CameraFrame {
            dt: DT,
            look: Vec2::ZERO,
            body_yaw,
            zone_exited: false,
            occupied_cones: cones,
        }
    }

    #[test]
    fn test_next_state_exit_beats_entry() {
        let signals = TransitionSignals {
            zone_exited: true,
            entry_qualified: true,
            ..Default::default()
        };
        assert_eq!(next_state(CameraState::Free, &signals), CameraState::Free);
        assert_eq!(
            next_state(CameraState::LockedOverhead, &signals),
            CameraState::ReturnFree
        );
    }

    #[test]
    fn test_next_state_look_around_is_sticky() {
        let signals = TransitionSignals {
            zone_exited: true,
            entry_qualified: true,
            look_exceeded: true,
            yaw_drifted: true,
            rest_converged: true,
        };
        assert_eq!(
            next_state(CameraState::LockAroundLeft, &signals),
            CameraState::LockAroundLeft
        );
    }

    #[test]
    fn test_free_to_locked_requires_pitch_band() {
        let cones = [AcceptanceCone::default()];
        let mut rig = DeskCameraRig::new(Vec3::Y, Some(60.0), CameraTuning::default());

        rig.head.pitch = 10.0;
        rig.tick(&frame(&cones, 90.0));
        assert_eq!(rig.state(), CameraState::Free);

        rig.head.pitch = 45.0;
        let change = rig.tick(&frame(&cones, 90.0));
        assert_eq!(change, Some((CameraState::Free, CameraState::LockedOverhead)));
        assert_eq!(rig.entry_yaw(), 90.0);
    }

    #[test]
    fn test_locked_blends_toward_overhead_pose() {
        let mut rig = DeskCameraRig::new(Vec3::ZERO, None, CameraTuning::default());
        rig.set_locked_overhead();
        for _ in 0..600 {
            rig.tick(&frame(&[], 0.0));
        }
        assert_eq!(rig.state(), CameraState::LockedOverhead);
        assert!((rig.head.pitch - 60.0).abs() < 0.01);
        assert!((rig.head.position.z - 0.3).abs() < 0.001);
    }

    #[test]
    fn test_look_up_releases_lock() {
        let mut rig = DeskCameraRig::new(Vec3::ZERO, None, CameraTuning::default());
        rig.set_locked_overhead();

        // 0.1 threshold at dt 1/60 and look 3.0 → crosses after a few frames
        let mut released = false;
        for _ in 0..10 {
            let mut f = frame(&[], 0.0);
            f.look = Vec2::new(0.0, 3.0);
            if rig.tick(&f).is_some() {
                released = true;
                break;
            }
        }
        assert!(released);
        assert_eq!(rig.state(), CameraState::ReturnFree);
    }

    #[test]
    fn test_yaw_drift_releases_lock() {
        let mut rig = DeskCameraRig::new(Vec3::ZERO, None, CameraTuning::default());
        rig.tick(&frame(&[], 90.0));
        rig.set_locked_overhead();

        rig.tick(&frame(&[], 105.0));
        assert_eq!(rig.state(), CameraState::LockedOverhead);

        rig.tick(&frame(&[], 111.0));
        assert_eq!(rig.state(), CameraState::ReturnFree);
    }

    #[test]
    fn test_fov_relaxes_to_rest() {
        let mut rig = DeskCameraRig::new(Vec3::ZERO, Some(60.0), CameraTuning::default());
        rig.set_fov(40.0);
        rig.set_look_around_right();
        for _ in 0..600 {
            rig.tick(&frame(&[], 0.0));
        }
        assert!((rig.fov().unwrap_or_default() - 60.0).abs() < 0.01);
        assert!((rig.head.roll + 15.0).abs() < 0.01);
        assert!((rig.head.position.x - 0.2).abs() < 0.001);
    }

    #[test]
    fn test_free_pitch_clamped() {
        let mut rig = DeskCameraRig::new(Vec3::ZERO, None, CameraTuning::default());
        for _ in 0..2000 {
            let mut f = frame(&[], 0.0);
            f.look = Vec2::new(0.0, -10.0);
            rig.tick(&f);
        }
        assert!((rig.head.pitch - 85.0).abs() < 1e-4);
    }
}
