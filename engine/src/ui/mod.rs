//! UI Module
//!
//! Journal interaction core: the layout tree, drag-and-drop placement with
//! exact rollback, delete confirmation, hover page flipping and item focus.
//! Rendering and hit-testing stay with the view layer; it reports the element
//! under the pointer and applies [`DragVisual`] states.

pub mod deletion;
pub mod drag;
pub mod focus;
pub mod geometry;
pub mod layout;
pub mod page_flip;

pub use deletion::{DeleteRequest, DeletionError, DeletionWorkflow};
pub use drag::{
    ConcurrentDragPolicy, DragError, DragSession, DragSessionManager, DragSnapshot, DropOutcome,
    LIFTED_ALPHA, RollbackReason,
};
pub use focus::{FOCUS_ANIMATION_SPEED, FOCUS_SCALE, FocusChange, FocusViewer};
pub use geometry::{ScreenRect, is_fully_inside};
pub use layout::{
    ContainerLookup, ContainerRole, DragVisual, ElementId, GeometryProvider, LayoutError,
    LayoutTree,
};
pub use page_flip::{FLIP_INITIAL_DELAY, FLIP_INTERVAL, FlipDirection, PageFlipTimer};
