//! Player Journal
//!
//! The journal panel ties the UI pieces together: a book of page spreads, an
//! inbox of captured photos, sticky notes, drag-and-drop between them, the
//! delete confirmation prompt, the focus viewer and the hover page flippers.
//!
//! Opening the journal frees the cursor and stops the player; the host passes
//! [`PlayerJournal::movement_enabled`] to the desk scene every frame.

use glam::Vec2;
use thiserror::Error;

use crate::game::capture::{CaptureError, CaptureRequest, CapturedPhoto};
use crate::game::config::JournalTuning;
use crate::ui::{
    ContainerRole, DeleteRequest, DeletionError, DeletionWorkflow, DragError, DragSession,
    DragSessionManager, DropOutcome, ElementId, FlipDirection, FocusChange, FocusViewer,
    LayoutError, LayoutTree, PageFlipTimer,
};

/// Layout units of a freshly spawned sticky note
pub const STICKY_NOTE_SIZE: Vec2 = Vec2::new(150.0, 150.0);
/// Layout units of a polaroid in the inbox
pub const POLAROID_SIZE: Vec2 = Vec2::new(120.0, 140.0);
const INBOX_PADDING: f32 = 8.0;

#[derive(Debug, Error, PartialEq)]
pub enum JournalError {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Drag(#[from] DragError),
    #[error(transparent)]
    Deletion(#[from] DeletionError),
    #[error(transparent)]
    Capture(#[from] CaptureError),
}

/// Keys the journal listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalKey {
    /// Opens the journal (J)
    Journal,
    /// Closes the journal (Esc)
    Escape,
    /// Takes a photo (P)
    Photo,
}

/// What a key press did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalAction {
    Opened,
    Closed,
    /// The host should grab the frame and call [`PlayerJournal::record_capture`]
    CaptureRequested,
    Ignored,
}

/// Elements the journal drives. Optional parts disable their feature.
#[derive(Debug, Clone, PartialEq)]
pub struct JournalLayout {
    pub panel: ElementId,
    pub spreads: Vec<ElementId>,
    pub inbox: Option<ElementId>,
    pub trash: Option<ElementId>,
    pub delete_holding: Option<ElementId>,
    pub focus_container: Option<ElementId>,
    pub focus_dimmer: Option<ElementId>,
}

impl JournalLayout {
    /// Build the usual journal panel on `tree`'s canvas: page spreads on the
    /// left, the inbox and trash on the right, with the delete prompt and
    /// focus layer on top.
    pub fn standard(tree: &mut LayoutTree, page_count: usize) -> Result<Self, LayoutError> {
        let root = tree.root();
        let canvas = tree.size(root)?;
        let at = |x: f32, y: f32| Vec2::new(canvas.x * x, canvas.y * y);

        let panel = tree.add_element(root, "JournalPanel", Vec2::ZERO, canvas)?;
        let spreads = (0..page_count)
            .map(|i| {
                tree.add_container(
                    panel,
                    &format!("PageSpread{i}"),
                    ContainerRole::Page,
                    at(0.05, 0.1),
                    at(0.6, 0.8),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        let inbox = tree.add_container(
            panel,
            "InboxContent",
            ContainerRole::Staging,
            at(0.7, 0.3),
            at(0.25, 0.6),
        )?;
        let trash = tree.add_container(
            panel,
            "Trash",
            ContainerRole::Trash,
            at(0.7, 0.1),
            at(0.25, 0.15),
        )?;
        let delete_holding = tree.add_element(
            root,
            "DeleteConfirmPanel",
            at(0.35, 0.35),
            at(0.3, 0.3),
        )?;
        tree.set_active(delete_holding, false)?;
        let focus_dimmer = tree.add_element(root, "FocusDimmer", Vec2::ZERO, canvas)?;
        let focus_container = tree.add_element(root, "FocusContainer", at(0.5, 0.5), Vec2::ZERO)?;

        Ok(Self {
            panel,
            spreads,
            inbox: Some(inbox),
            trash: Some(trash),
            delete_holding: Some(delete_holding),
            focus_container: Some(focus_container),
            focus_dimmer: Some(focus_dimmer),
        })
    }
}

/// Ordered page spreads with exactly one visible.
#[derive(Debug, Clone)]
pub struct PageBook {
    spreads: Vec<ElementId>,
    current: usize,
}

impl PageBook {
    pub fn new(tree: &mut LayoutTree, spreads: Vec<ElementId>) -> Result<Self, LayoutError> {
        let book = Self { spreads, current: 0 };
        book.refresh(tree)?;
        Ok(book)
    }

    #[inline]
    pub fn current(&self) -> usize {
        self.current
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.spreads.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.spreads.is_empty()
    }

    pub fn current_spread(&self) -> Option<ElementId> {
        self.spreads.get(self.current).copied()
    }

    /// Whether the "previous" affordance is interactable.
    pub fn can_go_prev(&self) -> bool {
        self.current > 0
    }

    /// Whether the "next" affordance is interactable.
    pub fn can_go_next(&self) -> bool {
        self.current + 1 < self.spreads.len()
    }

    /// Turn forward. Returns false at the last spread.
    pub fn next(&mut self, tree: &mut LayoutTree) -> Result<bool, LayoutError> {
        if !self.can_go_next() {
            return Ok(false);
        }
        self.current += 1;
        self.refresh(tree)?;
        Ok(true)
    }

    /// Turn back. Returns false at the first spread.
    pub fn prev(&mut self, tree: &mut LayoutTree) -> Result<bool, LayoutError> {
        if !self.can_go_prev() {
            return Ok(false);
        }
        self.current -= 1;
        self.refresh(tree)?;
        Ok(true)
    }

    pub fn turn(
        &mut self,
        tree: &mut LayoutTree,
        direction: FlipDirection,
    ) -> Result<bool, LayoutError> {
        match direction {
            FlipDirection::Next => self.next(tree),
            FlipDirection::Previous => self.prev(tree),
        }
    }

    fn refresh(&self, tree: &mut LayoutTree) -> Result<(), LayoutError> {
        for (i, &spread) in self.spreads.iter().enumerate() {
            tree.set_active(spread, i == self.current)?;
        }
        Ok(())
    }
}

/// A photo in the inbox.
#[derive(Debug, Clone, PartialEq)]
pub struct InboxEntry {
    pub photo: CapturedPhoto,
    /// Polaroid element showing the photo; `None` once it is deleted or when
    /// there is no inbox to put it in
    pub element: Option<ElementId>,
}

/// Result of dropping a dragged item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JournalDrop {
    pub outcome: DropOutcome,
    /// Set when the drop hit the trash
    pub delete: Option<DeleteRequest>,
}

/// The in-game journal.
#[derive(Debug, Clone)]
pub struct PlayerJournal {
    tree: LayoutTree,
    layout: JournalLayout,
    open: bool,
    book: PageBook,
    drag: DragSessionManager,
    deletion: DeletionWorkflow,
    focus: FocusViewer,
    next_flipper: PageFlipTimer,
    prev_flipper: PageFlipTimer,
    inbox: Vec<InboxEntry>,
}

impl PlayerJournal {
    /// Wire the journal onto an existing layout. The panel starts closed.
    pub fn new(
        mut tree: LayoutTree,
        layout: JournalLayout,
        tuning: &JournalTuning,
    ) -> Result<Self, JournalError> {
        if layout.inbox.is_none() {
            tracing::warn!("no inbox assigned; captured photos will not be shown");
        }
        tree.set_active(layout.panel, false)?;

        let book = PageBook::new(&mut tree, layout.spreads.clone())?;

        let mut drag = DragSessionManager::new(tuning.concurrent_drag);
        drag.lifted_alpha = tuning.lifted_alpha;

        let deletion = DeletionWorkflow::new(layout.delete_holding);

        let mut focus = FocusViewer::new(&mut tree, layout.focus_container, layout.focus_dimmer)?;
        focus.focus_scale = tuning.focus_scale;
        focus.animation_speed = tuning.focus_animation_speed;

        let flipper = |direction| {
            PageFlipTimer::with_timing(direction, tuning.flip_initial_delay, tuning.flip_interval)
        };

        Ok(Self {
            tree,
            layout,
            open: false,
            book,
            drag,
            deletion,
            focus,
            next_flipper: flipper(FlipDirection::Next),
            prev_flipper: flipper(FlipDirection::Previous),
            inbox: Vec::new(),
        })
    }

    /// Canvas of `screen_size` pixels with the standard layout.
    pub fn with_standard_layout(
        screen_size: Vec2,
        scale_factor: f32,
        page_count: usize,
        tuning: &JournalTuning,
    ) -> Result<Self, JournalError> {
        let mut tree = LayoutTree::new(screen_size, scale_factor);
        let layout = JournalLayout::standard(&mut tree, page_count)?;
        Self::new(tree, layout, tuning)
    }

    #[inline]
    pub fn tree(&self) -> &LayoutTree {
        &self.tree
    }

    #[inline]
    pub fn layout(&self) -> &JournalLayout {
        &self.layout
    }

    #[inline]
    pub fn book(&self) -> &PageBook {
        &self.book
    }

    #[inline]
    pub fn inbox(&self) -> &[InboxEntry] {
        &self.inbox
    }

    #[inline]
    pub fn deletion(&self) -> &DeletionWorkflow {
        &self.deletion
    }

    #[inline]
    pub fn focused_item(&self) -> Option<ElementId> {
        self.focus.focused_item()
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.open
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Player movement runs only while the journal is closed.
    #[inline]
    pub fn movement_enabled(&self) -> bool {
        !self.open
    }

    /// The cursor is locked (and hidden) while the journal is closed.
    #[inline]
    pub fn cursor_locked(&self) -> bool {
        !self.open
    }

    // ------------------------------------------------------------------
    // Panel
    // ------------------------------------------------------------------

    pub fn handle_key(&mut self, key: JournalKey) -> Result<JournalAction, JournalError> {
        let action = match key {
            JournalKey::Journal if !self.open => {
                self.toggle()?;
                JournalAction::Opened
            }
            JournalKey::Escape if self.open => {
                self.toggle()?;
                JournalAction::Closed
            }
            JournalKey::Photo if !self.open => JournalAction::CaptureRequested,
            _ => JournalAction::Ignored,
        };
        Ok(action)
    }

    /// Flip the panel open or closed. Closing puts back anything mid-drag.
    pub fn toggle(&mut self) -> Result<(), JournalError> {
        if self.open {
            if let Some(snapshot) = self.drag.cancel(&mut self.tree)? {
                tracing::debug!(item = ?snapshot.item, "journal closed mid-drag; item restored");
            }
            self.next_flipper.pointer_exit();
            self.prev_flipper.pointer_exit();
        }
        self.open = !self.open;
        self.tree.set_active(self.layout.panel, self.open)?;
        tracing::debug!(open = self.open, "journal toggled");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Content
    // ------------------------------------------------------------------

    /// Add a captured photo to the inbox.
    pub fn record_capture(&mut self, request: CaptureRequest) -> Result<&InboxEntry, JournalError> {
        self.push_capture(request.take_now())
    }

    /// Validate a raw screen size, then record it as a capture.
    pub fn capture_screen(&mut self, width: i32, height: i32) -> Result<&InboxEntry, JournalError> {
        let request = CaptureRequest::new(width, height)?;
        self.record_capture(request)
    }

    pub fn push_capture(&mut self, photo: CapturedPhoto) -> Result<&InboxEntry, JournalError> {
        let element = match self.layout.inbox.filter(|&inbox| self.tree.contains(inbox)) {
            Some(inbox) => Some(self.tree.add_element(
                inbox,
                "Polaroid",
                Vec2::splat(INBOX_PADDING),
                POLAROID_SIZE,
            )?),
            None => None,
        };
        tracing::info!(
            file = %photo.file_name,
            width = photo.width,
            height = photo.height,
            "photo captured"
        );
        self.inbox.push(InboxEntry { photo, element });
        let index = self.inbox.len() - 1;
        Ok(&self.inbox[index])
    }

    /// Spawn a sticky note on the panel, centred on the screen.
    pub fn spawn_sticky_note(&mut self, screen_size: Vec2) -> Result<ElementId, JournalError> {
        let panel = self.layout.panel;
        let scale = self.tree.world_scale(panel)?;
        let centre = (screen_size * 0.5 - self.tree.world_origin(panel)?) / scale;
        let note = self.tree.add_element(
            panel,
            "StickyNote",
            centre - STICKY_NOTE_SIZE * 0.5,
            STICKY_NOTE_SIZE,
        )?;
        Ok(note)
    }

    // ------------------------------------------------------------------
    // Drag and drop
    // ------------------------------------------------------------------

    pub fn begin_drag(
        &mut self,
        item: ElementId,
        pointer: Vec2,
    ) -> Result<DragSession, JournalError> {
        // An item still easing back from focus is snapped home first, so the
        // snapshot holds its resting pose and the animation stops writing to it
        if self.focus.focused_item() != Some(item) {
            self.focus.settle(&mut self.tree, item)?;
        }
        Ok(self.drag.begin_drag(&mut self.tree, item, pointer)?)
    }

    pub fn drag_to(&mut self, session: DragSession, pointer: Vec2) -> Result<(), JournalError> {
        Ok(self.drag.update_drag(&mut self.tree, session, pointer)?)
    }

    /// Drop the dragged item on `hit`. Trash drops go to the delete prompt.
    pub fn end_drag(
        &mut self,
        session: DragSession,
        hit: Option<ElementId>,
    ) -> Result<JournalDrop, JournalError> {
        let outcome = self.drag.end_drag(&mut self.tree, session, hit)?;
        let delete = match outcome {
            DropOutcome::DeleteRequested(snapshot) => {
                self.focus.forget(&mut self.tree, snapshot.item)?;
                Some(self.deletion.request_delete(&mut self.tree, snapshot)?)
            }
            _ => None,
        };
        Ok(JournalDrop { outcome, delete })
    }

    /// Destroy the item waiting in the delete prompt.
    pub fn confirm_delete(&mut self) -> Result<Vec<ElementId>, JournalError> {
        let removed = self.deletion.confirm(&mut self.tree)?;
        for &id in &removed {
            self.focus.forget(&mut self.tree, id)?;
        }
        self.inbox
            .retain(|entry| entry.element.is_none_or(|e| !removed.contains(&e)));
        Ok(removed)
    }

    /// Put the item waiting in the delete prompt back where it came from.
    pub fn cancel_delete(&mut self) -> Result<ElementId, JournalError> {
        let item = self.deletion.cancel(&mut self.tree)?;
        self.focus.forget(&mut self.tree, item)?;
        Ok(item)
    }

    // ------------------------------------------------------------------
    // Focus
    // ------------------------------------------------------------------

    /// Route a click on `item` to the focus viewer. The item parked in the
    /// delete prompt cannot be focused.
    pub fn click(&mut self, item: ElementId) -> Result<FocusChange, JournalError> {
        if self.deletion.pending_item() == Some(item) {
            return Ok(FocusChange::Ignored);
        }
        let dragging = self.drag.is_dragging();
        Ok(self.focus.click(&mut self.tree, item, dragging)?)
    }

    pub fn dimmer_click(&mut self) -> Result<FocusChange, JournalError> {
        Ok(self.focus.dimmer_click(&mut self.tree)?)
    }

    // ------------------------------------------------------------------
    // Page turning
    // ------------------------------------------------------------------

    pub fn next_page(&mut self) -> Result<bool, JournalError> {
        Ok(self.book.next(&mut self.tree)?)
    }

    pub fn prev_page(&mut self) -> Result<bool, JournalError> {
        Ok(self.book.prev(&mut self.tree)?)
    }

    pub fn flipper_enter(&mut self, direction: FlipDirection) {
        let dragging = self.drag.is_dragging();
        self.flipper_mut(direction).pointer_enter(dragging);
    }

    pub fn flipper_exit(&mut self, direction: FlipDirection) {
        self.flipper_mut(direction).pointer_exit();
    }

    fn flipper_mut(&mut self, direction: FlipDirection) -> &mut PageFlipTimer {
        match direction {
            FlipDirection::Next => &mut self.next_flipper,
            FlipDirection::Previous => &mut self.prev_flipper,
        }
    }

    /// Advance hover flipping and the focus animation.
    pub fn tick(&mut self, dt: f32) -> Result<(), JournalError> {
        let dragging = self.drag.is_dragging();
        for direction in [FlipDirection::Next, FlipDirection::Previous] {
            let flips = self.flipper_mut(direction).tick(dt, dragging);
            for _ in 0..flips {
                if !self.book.turn(&mut self.tree, direction)? {
                    break;
                }
            }
        }
        self.focus.tick(&mut self.tree, dt)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Vec2 = Vec2::new(1000.0, 800.0);

    fn journal(pages: usize) -> PlayerJournal {
        PlayerJournal::with_standard_layout(SCREEN, 1.0, pages, &JournalTuning::default()).unwrap()
    }

    #[test]
    fn test_keys_respect_open_state() {
        let mut j = journal(2);
        assert!(j.movement_enabled());
        assert_eq!(j.handle_key(JournalKey::Escape).unwrap(), JournalAction::Ignored);
        assert_eq!(j.handle_key(JournalKey::Photo).unwrap(), JournalAction::CaptureRequested);

        assert_eq!(j.handle_key(JournalKey::Journal).unwrap(), JournalAction::Opened);
        assert!(j.is_open());
        assert!(!j.cursor_locked());
        assert!(!j.movement_enabled());
        assert!(j.tree().is_active(j.layout().panel).unwrap());

        assert_eq!(j.handle_key(JournalKey::Journal).unwrap(), JournalAction::Ignored);
        assert_eq!(j.handle_key(JournalKey::Photo).unwrap(), JournalAction::Ignored);
        assert_eq!(j.handle_key(JournalKey::Escape).unwrap(), JournalAction::Closed);
        assert!(j.movement_enabled());
    }

    #[test]
    fn test_book_shows_one_spread_and_clamps() {
        let mut j = journal(3);
        let spreads = j.layout().spreads.clone();
        assert!(j.tree().is_active(spreads[0]).unwrap());
        assert!(!j.tree().is_active(spreads[1]).unwrap());
        assert!(!j.book().can_go_prev());
        assert!(j.book().can_go_next());

        assert!(!j.prev_page().unwrap());
        assert!(j.next_page().unwrap());
        assert!(j.next_page().unwrap());
        assert!(!j.next_page().unwrap());
        assert_eq!(j.book().current(), 2);
        assert!(!j.book().can_go_next());
        let visible = spreads
            .iter()
            .filter(|&&s| j.tree().is_active(s).unwrap())
            .count();
        assert_eq!(visible, 1);
    }

    #[test]
    fn test_empty_book() {
        let mut j = journal(0);
        assert!(j.book().is_empty());
        assert!(!j.book().can_go_next());
        assert!(!j.next_page().unwrap());
        assert_eq!(j.book().current_spread(), None);
    }

    #[test]
    fn test_sticky_note_centred_on_screen() {
        let mut j =
            PlayerJournal::with_standard_layout(SCREEN, 2.0, 1, &JournalTuning::default()).unwrap();
        let note = j.spawn_sticky_note(SCREEN).unwrap();
        let rect = j.tree().world_rect(note).unwrap();
        let centre = (rect.min + rect.max) * 0.5;
        assert!((centre - SCREEN * 0.5).length() < 1e-3);
        assert_eq!(j.tree().parent(note).unwrap(), Some(j.layout().panel));
    }

    #[test]
    fn test_capture_goes_to_inbox() {
        let mut j = journal(1);
        let entry = j.capture_screen(640, 480).unwrap().clone();
        assert!(entry.photo.file_name.starts_with("img_"));
        assert!(entry.photo.file_name.ends_with(".png"));
        let polaroid = entry.element.unwrap();
        assert_eq!(j.tree().parent(polaroid).unwrap(), j.layout().inbox);

        let err = j.capture_screen(0, 480).unwrap_err();
        assert!(matches!(err, JournalError::Capture(_)));
        assert_eq!(j.inbox().len(), 1);
    }

    #[test]
    fn test_close_mid_drag_restores_item() {
        let mut j = journal(1);
        j.handle_key(JournalKey::Journal).unwrap();
        let entry = j.capture_screen(640, 480).unwrap().clone();
        let polaroid = entry.element.unwrap();
        let before = j.tree().local_position(polaroid).unwrap();

        let session = j.begin_drag(polaroid, Vec2::new(750.0, 300.0)).unwrap();
        j.drag_to(session, Vec2::new(400.0, 300.0)).unwrap();
        j.handle_key(JournalKey::Escape).unwrap();

        assert!(!j.is_dragging());
        assert_eq!(j.tree().parent(polaroid).unwrap(), j.layout().inbox);
        assert_eq!(j.tree().local_position(polaroid).unwrap(), before);
    }
}
