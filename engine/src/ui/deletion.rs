//! Delete Confirmation
//!
//! Items dropped on a trash container are parked in a holding area while the
//! player confirms or cancels. Confirming destroys the item; cancelling undoes
//! the drop through [`DragSessionManager::rollback`] using the snapshot taken
//! when the drag began.

use thiserror::Error;

use super::drag::{DragSessionManager, DragSnapshot};
use super::layout::{ElementId, LayoutError, LayoutTree};

#[derive(Debug, Error, PartialEq)]
pub enum DeletionError {
    #[error("no item is waiting for delete confirmation")]
    NothingPending,
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// How a delete request was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteRequest {
    /// Item parked; waiting for confirm or cancel
    AwaitingConfirmation,
    /// No holding area configured; the item was put back instead
    Unavailable,
}

/// Confirm/cancel workflow for a single pending deletion.
#[derive(Debug, Clone)]
pub struct DeletionWorkflow {
    /// Panel that holds the pending item and the confirm/cancel prompt
    holding_area: Option<ElementId>,
    pending: Option<DragSnapshot>,
}

impl DeletionWorkflow {
    pub fn new(holding_area: Option<ElementId>) -> Self {
        if holding_area.is_none() {
            tracing::warn!("no delete holding area assigned; trash drops will be put back");
        }
        Self {
            holding_area,
            pending: None,
        }
    }

    #[inline]
    pub fn holding_area(&self) -> Option<ElementId> {
        self.holding_area
    }

    #[inline]
    pub fn pending_item(&self) -> Option<ElementId> {
        self.pending.map(|s| s.item)
    }

    #[inline]
    pub fn is_awaiting_confirmation(&self) -> bool {
        self.pending.is_some()
    }

    /// Park `snapshot.item` and show the confirmation prompt.
    ///
    /// A request arriving while another item is pending cancels the older one
    /// first so it is never orphaned in the holding area.
    pub fn request_delete(
        &mut self,
        tree: &mut LayoutTree,
        snapshot: DragSnapshot,
    ) -> Result<DeleteRequest, DeletionError> {
        let Some(holding) = self.holding_area.filter(|&h| tree.contains(h)) else {
            tracing::warn!(
                item = ?snapshot.item,
                "delete requested without a holding area; restoring item"
            );
            DragSessionManager::rollback(tree, &snapshot)?;
            return Ok(DeleteRequest::Unavailable);
        };

        if self.pending.is_some() {
            self.cancel(tree)?;
        }

        tree.set_active(holding, true)?;
        tree.reparent(snapshot.item, holding)?;
        tree.set_draggable(snapshot.item, false)?;
        self.pending = Some(snapshot);
        Ok(DeleteRequest::AwaitingConfirmation)
    }

    /// Destroy the pending item. Returns every element removed.
    pub fn confirm(&mut self, tree: &mut LayoutTree) -> Result<Vec<ElementId>, DeletionError> {
        let snapshot = self.pending.take().ok_or(DeletionError::NothingPending)?;
        self.close(tree)?;
        Ok(tree.remove(snapshot.item)?)
    }

    /// Put the pending item back where it was before the drag.
    pub fn cancel(&mut self, tree: &mut LayoutTree) -> Result<ElementId, DeletionError> {
        let snapshot = self.pending.take().ok_or(DeletionError::NothingPending)?;
        self.close(tree)?;
        tree.set_draggable(snapshot.item, true)?;
        DragSessionManager::rollback(tree, &snapshot)?;
        Ok(snapshot.item)
    }

    fn close(&mut self, tree: &mut LayoutTree) -> Result<(), LayoutError> {
        match self.holding_area.filter(|&h| tree.contains(h)) {
            Some(holding) => tree.set_active(holding, false),
            None => Ok(()),
        }
    }
}
