//! Journal Configuration
//!
//! Timing and feel of the journal UI: drag opacity, hover page flipping and
//! the focus viewer.

use serde::{Deserialize, Serialize};

use crate::ui::{
    ConcurrentDragPolicy, FLIP_INITIAL_DELAY, FLIP_INTERVAL, FOCUS_ANIMATION_SPEED, FOCUS_SCALE,
    LIFTED_ALPHA,
};

/// Journal UI tuning. `Default` matches the shipped inspector values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalTuning {
    /// Opacity of an item while it is dragged (0..=1)
    pub lifted_alpha: f32,
    /// Hover time before the first repeat interval starts (seconds)
    pub flip_initial_delay: f32,
    /// Time between hover flips (seconds)
    pub flip_interval: f32,
    /// Scale of a focused item
    pub focus_scale: f32,
    /// Focus animation progress per second
    pub focus_animation_speed: f32,
    /// Behaviour when a drag starts while another is active
    pub concurrent_drag: ConcurrentDragPolicy,
}

impl Default for JournalTuning {
    fn default() -> Self {
        Self {
            lifted_alpha: LIFTED_ALPHA,
            flip_initial_delay: FLIP_INITIAL_DELAY,
            flip_interval: FLIP_INTERVAL,
            focus_scale: FOCUS_SCALE,
            focus_animation_speed: FOCUS_ANIMATION_SPEED,
            concurrent_drag: ConcurrentDragPolicy::Reject,
        }
    }
}
