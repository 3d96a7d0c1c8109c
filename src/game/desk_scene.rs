//! Desk Scene
//!
//! Per-frame composition of the first-person body, the desk trigger zones and
//! the desk camera rig.
//!
//! Frame order:
//! 1. Nothing runs while movement is disabled (journal open).
//! 2. The body turns and computes its planar velocity.
//! 3. Queued trigger callbacks update zone occupancy. Any exit this frame
//!    blocks entry for the same frame.
//! 4. The camera rig ticks against the occupied zones.

use glam::Vec3;

use crate::camera::{
    AcceptanceCone, CameraFrame, CameraState, DeskCameraRig, DeskZone, PlayerId, ZoneEvent, ZoneId,
};
use crate::game::config::GameConfig;
use crate::input::FrameInput;
use crate::player::FirstPersonBody;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    Enter(ZoneId),
    Exit(ZoneId),
}

/// What happened during one scene tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneFrame {
    /// Planar body velocity for the physics step
    pub velocity: Vec3,
    /// Camera state change as `(from, to)`
    pub transition: Option<(CameraState, CameraState)>,
    /// Zone events applied this frame
    pub zone_events: Vec<ZoneEvent>,
}

/// The player at the desk.
#[derive(Debug, Clone)]
pub struct DeskScene {
    pub body: FirstPersonBody,
    pub rig: DeskCameraRig,
    zones: Vec<DeskZone>,
    player: PlayerId,
    pending: Vec<Trigger>,
    movement_enabled: bool,
}

impl DeskScene {
    pub fn new(body: FirstPersonBody, rig: DeskCameraRig, zones: Vec<DeskZone>) -> Self {
        Self {
            body,
            rig,
            zones,
            player: PlayerId::default(),
            pending: Vec::new(),
            movement_enabled: true,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        let body = FirstPersonBody::new(config.movement);
        let rig = DeskCameraRig::new(
            config.scene.head_rest_position,
            config.scene.field_of_view,
            config.camera,
        );
        let zones = config.scene.zones.iter().map(|z| z.build()).collect();
        Self::new(body, rig, zones)
    }

    #[inline]
    pub fn player(&self) -> PlayerId {
        self.player
    }

    #[inline]
    pub fn zones(&self) -> &[DeskZone] {
        &self.zones
    }

    #[inline]
    pub fn camera_state(&self) -> CameraState {
        self.rig.state()
    }

    #[inline]
    pub fn movement_enabled(&self) -> bool {
        self.movement_enabled
    }

    /// Freeze or resume the player (the journal freezes it while open).
    pub fn set_movement_enabled(&mut self, enabled: bool) {
        self.movement_enabled = enabled;
    }

    /// Physics callback: the player entered zone `zone`. Applied next tick.
    pub fn enter_zone(&mut self, zone: ZoneId) {
        self.pending.push(Trigger::Enter(zone));
    }

    /// Physics callback: the player left zone `zone`. Applied next tick.
    pub fn exit_zone(&mut self, zone: ZoneId) {
        self.pending.push(Trigger::Exit(zone));
    }

    pub fn tick(&mut self, input: &FrameInput) -> SceneFrame {
        if !self.movement_enabled {
            return SceneFrame::default();
        }

        let velocity = self.body.update(input);

        let mut zone_events = Vec::with_capacity(self.pending.len());
        for trigger in std::mem::take(&mut self.pending) {
            let id = match trigger {
                Trigger::Enter(id) | Trigger::Exit(id) => id,
            };
            let Some(zone) = self.zones.iter_mut().find(|z| z.id() == id) else {
                tracing::warn!(zone = ?id, "trigger for unknown desk zone ignored");
                continue;
            };
            zone_events.push(match trigger {
                Trigger::Enter(_) => zone.on_trigger_enter(self.player),
                Trigger::Exit(_) => zone.on_trigger_exit(self.player),
            });
        }
        let zone_exited = zone_events.iter().any(
            |e| matches!(e, ZoneEvent::Exited { player, .. } if *player == self.player),
        );

        let occupied: Vec<AcceptanceCone> = self
            .zones
            .iter()
            .filter(|z| z.is_occupied_by(self.player))
            .map(|z| z.cone)
            .collect();

        let transition = self.rig.tick(&CameraFrame {
            dt: input.dt,
            look: input.look,
            body_yaw: self.body.yaw(),
            zone_exited,
            occupied_cones: &occupied,
        });

        SceneFrame {
            velocity,
            transition,
            zone_events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn scene() -> DeskScene {
        let mut scene = DeskScene::from_config(&GameConfig::default());
        scene.body.set_yaw(90.0);
        scene
    }

    #[test]
    fn test_frozen_scene_does_nothing() {
        let mut scene = scene();
        scene.set_movement_enabled(false);
        scene.enter_zone(ZoneId(0));
        let frame = scene.tick(&FrameInput::new(0.1).with_movement(Vec2::Y).with_look(Vec2::X));

        assert_eq!(frame, SceneFrame::default());
        assert_eq!(scene.body.yaw(), 90.0);
        assert_eq!(scene.zones()[0].occupant(), None);
    }

    #[test]
    fn test_queued_enter_applies_on_tick() {
        let mut scene = scene();
        scene.enter_zone(ZoneId(0));
        let frame = scene.tick(&FrameInput::new(0.016));

        assert_eq!(
            frame.zone_events,
            vec![ZoneEvent::Entered {
                zone: ZoneId(0),
                player: scene.player(),
            }]
        );
        assert!(scene.zones()[0].is_occupied_by(scene.player()));
    }

    #[test]
    fn test_unknown_zone_ignored() {
        let mut scene = scene();
        scene.exit_zone(ZoneId(42));
        let frame = scene.tick(&FrameInput::new(0.016));
        assert!(frame.zone_events.is_empty());
        assert_eq!(scene.camera_state(), CameraState::Free);
    }
}
