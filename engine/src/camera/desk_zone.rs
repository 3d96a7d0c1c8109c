//! Desk Zones
//!
//! A desk zone is a trigger volume in front of a desk. The physics host reports
//! enter/exit callbacks; the zone only remembers which player is inside and
//! which facing directions count as "looking at the desk".

use serde::{Deserialize, Serialize};

use super::angles::angle_in_range;

/// Identifier of a desk zone within a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZoneId(pub u32);

/// Identifier of a player entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

/// Range of body yaw angles (degrees) that face the desk.
///
/// The range is inclusive and may wrap through 0 (e.g. `330..30`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AcceptanceCone {
    pub min_angle: f32,
    pub max_angle: f32,
}

impl Default for AcceptanceCone {
    fn default() -> Self {
        Self {
            min_angle: 70.0,
            max_angle: 110.0,
        }
    }
}

impl AcceptanceCone {
    pub fn new(min_angle: f32, max_angle: f32) -> Self {
        Self {
            min_angle,
            max_angle,
        }
    }

    /// Whether a body yaw (degrees, any range) faces the desk.
    #[inline]
    pub fn contains(&self, yaw: f32) -> bool {
        angle_in_range(yaw, self.min_angle, self.max_angle)
    }
}

/// Trigger callbacks surfaced by a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneEvent {
    Entered { zone: ZoneId, player: PlayerId },
    Exited { zone: ZoneId, player: PlayerId },
}

/// Trigger volume with an acceptance cone.
#[derive(Debug, Clone)]
pub struct DeskZone {
    id: ZoneId,
    /// Facing directions that qualify for the overhead pose
    pub cone: AcceptanceCone,
    /// Player currently inside the volume
    occupant: Option<PlayerId>,
}

impl DeskZone {
    pub fn new(id: ZoneId, cone: AcceptanceCone) -> Self {
        Self {
            id,
            cone,
            occupant: None,
        }
    }

    #[inline]
    pub fn id(&self) -> ZoneId {
        self.id
    }

    #[inline]
    pub fn occupant(&self) -> Option<PlayerId> {
        self.occupant
    }

    #[inline]
    pub fn is_occupied_by(&self, player: PlayerId) -> bool {
        self.occupant == Some(player)
    }

    /// Physics callback: a player entered the trigger volume.
    pub fn on_trigger_enter(&mut self, player: PlayerId) -> ZoneEvent {
        self.occupant = Some(player);
        ZoneEvent::Entered {
            zone: self.id,
            player,
        }
    }

    /// Physics callback: a player left the trigger volume.
    ///
    /// The exit is always reported to the leaving player, even if the zone had
    /// already lost track of it.
    pub fn on_trigger_exit(&mut self, player: PlayerId) -> ZoneEvent {
        if self.occupant == Some(player) {
            self.occupant = None;
        }
        ZoneEvent::Exited {
            zone: self.id,
            player,
        }
    }
}
