//! Drag-and-Drop Placement
//!
//! Moves journal items between containers with commit-or-rollback semantics.
//!
//! A drag is a session owned by [`DragSessionManager`]; the token returned by
//! [`DragSessionManager::begin_drag`] must be presented on every later call.
//! No session means no drag in progress.
//!
//! # Drop resolution
//!
//! 1. No hit element: roll back.
//! 2. A `Trash` container anywhere above the hit wins: the item is handed to
//!    the deletion workflow as [`DropOutcome::DeleteRequested`].
//! 3. Otherwise the nearest `Page` or `Staging` container is the target. The
//!    drop is accepted only if all four item corners lie inside the target
//!    (edges inclusive); the item is appended to the target's children.
//! 4. Anything else rolls back to the exact pre-drag container, local
//!    position and order index.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::geometry::is_fully_inside;
use super::layout::{
    ContainerLookup, ContainerRole, DragVisual, ElementId, GeometryProvider, LayoutError,
    LayoutTree,
};

/// Default opacity of an item while it is being dragged
pub const LIFTED_ALPHA: f32 = 0.6;

/// What to do when a drag starts while another one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConcurrentDragPolicy {
    /// Refuse the new drag
    #[default]
    Reject,
    /// Roll the active item back, then start the new drag
    CancelPrevious,
}

/// Token for one drag session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DragSession(u64);

/// Everything needed to undo a drag exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSnapshot {
    pub item: ElementId,
    pub original_container: ElementId,
    pub original_local_position: Vec2,
    pub original_order_index: usize,
}

/// Why a drop was rolled back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollbackReason {
    /// Nothing under the pointer
    NoHit,
    /// Hit element has no Page/Staging/Trash container above it
    NoContainer,
    /// Item overlapped the target container's edge
    NotContained { container: ElementId },
}

/// Result of ending a drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DropOutcome {
    /// Item now lives in `container` at `order_index`
    Committed {
        container: ElementId,
        order_index: usize,
    },
    /// Item was restored to its pre-drag placement
    RolledBack(RollbackReason),
    /// Item was dropped on a trash container; the snapshot allows a later undo
    DeleteRequested(DragSnapshot),
}

#[derive(Debug, Error, PartialEq)]
pub enum DragError {
    #[error("element {active:?} is already being dragged")]
    AlreadyDragging { active: ElementId },
    #[error("element {0:?} is not draggable")]
    NotDraggable(ElementId),
    #[error("no drag in progress")]
    NoActiveDrag,
    #[error("drag session {0:?} is no longer active")]
    StaleSession(DragSession),
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

#[derive(Debug, Clone)]
struct ActiveDrag {
    session: DragSession,
    snapshot: DragSnapshot,
    last_pointer: Vec2,
}

/// Owner of the single drag session.
#[derive(Debug, Clone)]
pub struct DragSessionManager {
    active: Option<ActiveDrag>,
    next_session: u64,
    /// Element dragged items are lifted into; the root canvas when unset
    drag_layer: Option<ElementId>,
    /// Opacity applied while dragging
    pub lifted_alpha: f32,
    pub policy: ConcurrentDragPolicy,
}

impl Default for DragSessionManager {
    fn default() -> Self {
        Self::new(ConcurrentDragPolicy::default())
    }
}

impl DragSessionManager {
    pub fn new(policy: ConcurrentDragPolicy) -> Self {
        Self {
            active: None,
            next_session: 1,
            drag_layer: None,
            lifted_alpha: LIFTED_ALPHA,
            policy,
        }
    }

    /// Lift dragged items into `layer` instead of the root canvas.
    pub fn set_drag_layer(&mut self, layer: Option<ElementId>) {
        self.drag_layer = layer;
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    #[inline]
    pub fn active_item(&self) -> Option<ElementId> {
        self.active.as_ref().map(|a| a.snapshot.item)
    }

    #[inline]
    pub fn active_session(&self) -> Option<DragSession> {
        self.active.as_ref().map(|a| a.session)
    }

    fn check_session(&self, session: DragSession) -> Result<&ActiveDrag, DragError> {
        match &self.active {
            Some(active) if active.session == session => Ok(active),
            Some(_) => Err(DragError::StaleSession(session)),
            None => Err(DragError::NoActiveDrag),
        }
    }

    /// Start dragging `item` with the pointer at `pointer` (screen pixels).
    ///
    /// Snapshots the item's placement, marks it lifted, and moves it to the
    /// drag layer so it draws above every container.
    pub fn begin_drag(
        &mut self,
        tree: &mut LayoutTree,
        item: ElementId,
        pointer: Vec2,
    ) -> Result<DragSession, DragError> {
        if let Some(active) = self.active_item() {
            match self.policy {
                ConcurrentDragPolicy::Reject => {
                    return Err(DragError::AlreadyDragging { active });
                }
                ConcurrentDragPolicy::CancelPrevious => {
                    self.cancel(tree)?;
                }
            }
        }

        if !tree.is_draggable(item)? {
            return Err(DragError::NotDraggable(item));
        }

        let snapshot = DragSnapshot {
            item,
            original_container: tree.parent(item)?.ok_or(LayoutError::NoParent(item))?,
            original_local_position: tree.local_position(item)?,
            original_order_index: tree.sibling_index(item)?,
        };

        let layer = self
            .drag_layer
            .filter(|&layer| tree.contains(layer))
            .unwrap_or_else(|| tree.root());
        tree.reparent(item, layer)?;
        tree.set_visual(item, DragVisual::lifted(self.lifted_alpha))?;

        let session = DragSession(self.next_session);
        self.next_session += 1;
        self.active = Some(ActiveDrag {
            session,
            snapshot,
            last_pointer: pointer,
        });
        Ok(session)
    }

    /// Follow the pointer. Screen-pixel deltas are converted to layout units
    /// through the drag layer's scale. Nothing is committed here.
    pub fn update_drag(
        &mut self,
        tree: &mut LayoutTree,
        session: DragSession,
        pointer: Vec2,
    ) -> Result<(), DragError> {
        let active = self.check_session(session)?;
        let item = active.snapshot.item;
        let delta = pointer - active.last_pointer;

        let scale = match tree.parent(item)? {
            Some(parent) => tree.world_scale(parent)?,
            None => tree.scale_factor(),
        };
        let position = tree.local_position(item)? + delta / scale;
        tree.set_local_position(item, position)?;

        if let Some(active) = self.active.as_mut() {
            active.last_pointer = pointer;
        }
        Ok(())
    }

    /// Finish the drag with `hit` as the element under the pointer.
    pub fn end_drag(
        &mut self,
        tree: &mut LayoutTree,
        session: DragSession,
        hit: Option<ElementId>,
    ) -> Result<DropOutcome, DragError> {
        self.check_session(session)?;
        let Some(active) = self.active.take() else {
            return Err(DragError::NoActiveDrag);
        };
        let snapshot = active.snapshot;
        let item = snapshot.item;
        tree.set_visual(item, DragVisual::RESTING)?;

        // The view makes the lifted item transparent to hit-testing; a hit on
        // it (or its children) means nothing useful was under the pointer.
        let hit = hit.filter(|&h| tree.contains(h) && !tree.is_descendant_of(h, item));
        let Some(hit) = hit else {
            Self::rollback(tree, &snapshot)?;
            return Ok(DropOutcome::RolledBack(RollbackReason::NoHit));
        };

        if tree.nearest_container(hit, &[ContainerRole::Trash]).is_some() {
            return Ok(DropOutcome::DeleteRequested(snapshot));
        }

        let Some(container) =
            tree.nearest_container(hit, &[ContainerRole::Page, ContainerRole::Staging])
        else {
            Self::rollback(tree, &snapshot)?;
            return Ok(DropOutcome::RolledBack(RollbackReason::NoContainer));
        };

        let item_corners = tree.world_corners(item).ok_or(LayoutError::UnknownElement(item))?;
        let target_corners = tree
            .world_corners(container)
            .ok_or(LayoutError::UnknownElement(container))?;

        if is_fully_inside(&item_corners, &target_corners) {
            tree.reparent(item, container)?;
            let order_index = tree.sibling_index(item)?;
            Ok(DropOutcome::Committed {
                container,
                order_index,
            })
        } else {
            tracing::debug!(?item, ?container, "drop rejected: item overlapping container edge");
            Self::rollback(tree, &snapshot)?;
            Ok(DropOutcome::RolledBack(RollbackReason::NotContained { container }))
        }
    }

    /// Abort the active drag, restoring the item. Returns the snapshot used.
    pub fn cancel(&mut self, tree: &mut LayoutTree) -> Result<Option<DragSnapshot>, DragError> {
        let Some(active) = self.active.take() else {
            return Ok(None);
        };
        Self::rollback(tree, &active.snapshot)?;
        Ok(Some(active.snapshot))
    }

    /// Restore an item to its snapshot placement exactly.
    ///
    /// Independent of any session so a deferred workflow (delete
    /// confirmation) can undo a drop later.
    pub fn rollback(tree: &mut LayoutTree, snapshot: &DragSnapshot) -> Result<(), LayoutError> {
        tree.insert_at(
            snapshot.item,
            snapshot.original_container,
            snapshot.original_order_index,
            snapshot.original_local_position,
        )?;
        tree.set_visual(snapshot.item, DragVisual::RESTING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Desk {
        tree: LayoutTree,
        page: ElementId,
        staging: ElementId,
        item: ElementId,
    }

    fn desk() -> Desk {
        let mut tree = LayoutTree::new(Vec2::new(1200.0, 800.0), 1.0);
        let root = tree.root();
        let page = tree
            .add_container(
                root,
                "Page",
                ContainerRole::Page,
                Vec2::new(0.0, 0.0),
                Vec2::new(500.0, 500.0),
            )
            .unwrap();
        let staging = tree
            .add_container(
                root,
                "Staging",
                ContainerRole::Staging,
                Vec2::new(600.0, 0.0),
                Vec2::new(300.0, 500.0),
            )
            .unwrap();
        let item = tree
            .add_element(staging, "Photo", Vec2::new(10.0, 10.0), Vec2::new(50.0, 50.0))
            .unwrap();
        Desk {
            tree,
            page,
            staging,
            item,
        }
    }

    #[test]
    fn test_begin_drag_lifts_item() {
        let mut d = desk();
        let mut drag = DragSessionManager::default();
        drag.begin_drag(&mut d.tree, d.item, Vec2::new(620.0, 20.0)).unwrap();

        assert!(drag.is_dragging());
        assert_eq!(d.tree.parent(d.item).unwrap(), Some(d.tree.root()));
        let visual = d.tree.visual(d.item).unwrap();
        assert!((visual.alpha - LIFTED_ALPHA).abs() < 1e-6);
        assert!(!visual.blocks_raycasts);
        // Screen position unchanged by the lift
        assert_eq!(d.tree.world_origin(d.item).unwrap(), Vec2::new(610.0, 10.0));
    }

    #[test]
    fn test_update_divides_by_scale_factor() {
        let mut d = desk();
        d.tree.set_scale_factor(2.0);
        let mut drag = DragSessionManager::default();
        let s = drag.begin_drag(&mut d.tree, d.item, Vec2::ZERO).unwrap();
        let before = d.tree.local_position(d.item).unwrap();

        drag.update_drag(&mut d.tree, s, Vec2::new(40.0, -20.0)).unwrap();
        assert_eq!(d.tree.local_position(d.item).unwrap(), before + Vec2::new(20.0, -10.0));
    }

    #[test]
    fn test_drop_on_root_rolls_back_no_container() {
        let mut d = desk();
        let mut drag = DragSessionManager::default();
        let s = drag.begin_drag(&mut d.tree, d.item, Vec2::ZERO).unwrap();
        let root = d.tree.root();

        let outcome = drag.end_drag(&mut d.tree, s, Some(root)).unwrap();
        assert_eq!(outcome, DropOutcome::RolledBack(RollbackReason::NoContainer));
        assert_eq!(d.tree.parent(d.item).unwrap(), Some(d.staging));
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_hit_on_dragged_item_counts_as_no_hit() {
        let mut d = desk();
        let mut drag = DragSessionManager::default();
        let s = drag.begin_drag(&mut d.tree, d.item, Vec2::ZERO).unwrap();
        let outcome = drag.end_drag(&mut d.tree, s, Some(d.item)).unwrap();
        assert_eq!(outcome, DropOutcome::RolledBack(RollbackReason::NoHit));
    }

    #[test]
    fn test_reject_policy_refuses_second_drag() {
        let mut d = desk();
        let other = d
            .tree
            .add_element(d.staging, "Note", Vec2::new(100.0, 100.0), Vec2::splat(20.0))
            .unwrap();
        let mut drag = DragSessionManager::default();
        drag.begin_drag(&mut d.tree, d.item, Vec2::ZERO).unwrap();

        assert_eq!(
            drag.begin_drag(&mut d.tree, other, Vec2::ZERO),
            Err(DragError::AlreadyDragging { active: d.item })
        );
        assert_eq!(d.tree.parent(other).unwrap(), Some(d.staging));
    }

    #[test]
    fn test_cancel_previous_policy_restores_old_item() {
        let mut d = desk();
        let other = d
            .tree
            .add_element(d.staging, "Note", Vec2::new(100.0, 100.0), Vec2::splat(20.0))
            .unwrap();
        let mut drag = DragSessionManager::new(ConcurrentDragPolicy::CancelPrevious);
        let first = drag.begin_drag(&mut d.tree, d.item, Vec2::ZERO).unwrap();
        drag.update_drag(&mut d.tree, first, Vec2::new(300.0, 0.0)).unwrap();

        let second = drag.begin_drag(&mut d.tree, other, Vec2::ZERO).unwrap();
        assert_ne!(first, second);
        assert_eq!(drag.active_item(), Some(other));
        assert_eq!(d.tree.parent(d.item).unwrap(), Some(d.staging));
        assert_eq!(d.tree.sibling_index(d.item).unwrap(), 0);
        assert_eq!(d.tree.local_position(d.item).unwrap(), Vec2::new(10.0, 10.0));

        assert_eq!(
            drag.update_drag(&mut d.tree, first, Vec2::ZERO),
            Err(DragError::StaleSession(first))
        );
    }

    #[test]
    fn test_not_draggable_refused() {
        let mut d = desk();
        d.tree.set_draggable(d.item, false).unwrap();
        let mut drag = DragSessionManager::default();
        assert_eq!(
            drag.begin_drag(&mut d.tree, d.item, Vec2::ZERO),
            Err(DragError::NotDraggable(d.item))
        );
    }

    #[test]
    fn test_end_without_drag_errors() {
        let mut d = desk();
        let mut drag = DragSessionManager::default();
        let s = drag.begin_drag(&mut d.tree, d.item, Vec2::ZERO).unwrap();
        drag.end_drag(&mut d.tree, s, Some(d.page)).unwrap();
        assert_eq!(
            drag.end_drag(&mut d.tree, s, Some(d.page)),
            Err(DragError::NoActiveDrag)
        );
    }
}
