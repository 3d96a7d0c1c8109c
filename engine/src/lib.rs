//! Dust Journal Engine
//!
//! Frame-driven core of the journal and desk interaction systems.
//! Everything in here is polled once per frame by a host loop; nothing
//! renders, reads devices, or touches the disk.
//!
//! # Modules
//!
//! - [`ui`] - Journal layout tree, drag-and-drop placement, deletion, page flipping, focus
//! - [`camera`] - Desk-aware first-person camera state machine and desk zones
//! - [`input`] - Per-frame input snapshot and look-delta accumulation
//! - [`player`] - First-person body yaw and planar movement
//! - [`game`] - Journal panel, capture inbox, configuration, desk scene composition
//!
//! # Example
//!
//! ```ignore
//! use dust_journal_engine::ui::{ContainerRole, DragSessionManager, LayoutTree};
//! use glam::Vec2;
//!
//! let mut tree = LayoutTree::new(Vec2::new(1920.0, 1080.0), 1.0);
//! let page = tree.add_container(
//!     tree.root(),
//!     "Page_1",
//!     ContainerRole::Page,
//!     Vec2::ZERO,
//!     Vec2::new(800.0, 600.0),
//! )?;
//! let staging = tree.add_container(
//!     tree.root(),
//!     "Staging",
//!     ContainerRole::Staging,
//!     Vec2::new(900.0, 0.0),
//!     Vec2::new(300.0, 600.0),
//! )?;
//! let photo = tree.add_element(
//!     staging,
//!     "Polaroid",
//!     Vec2::new(10.0, 10.0),
//!     Vec2::new(100.0, 120.0),
//! )?;
//!
//! let mut drag = DragSessionManager::default();
//! let session = drag.begin_drag(&mut tree, photo, Vec2::new(960.0, 60.0))?;
//! drag.update_drag(&mut tree, session, Vec2::new(260.0, 60.0))?;
//! let outcome = drag.end_drag(&mut tree, session, Some(page))?;
//! ```

pub mod camera;
pub mod input;
pub mod player;
pub mod ui;

// Game-level modules (located in src/game/ directory)
#[path = "../../src/game/mod.rs"]
pub mod game;

// Re-export the most commonly used types at crate level
pub use camera::{CameraState, DeskCameraRig, DeskZone};
pub use input::FrameInput;
pub use player::FirstPersonBody;
pub use ui::{ContainerRole, DragSessionManager, DropOutcome, ElementId, LayoutTree};
