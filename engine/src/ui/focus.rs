//! Focus Viewer
//!
//! Clicking a journal item lifts it into a focus layer above a dimmer and
//! animates it to the layer origin at an enlarged scale. Clicking it again, or
//! the dimmer, puts it back where it was. A focused item cannot be dragged.

use glam::Vec2;

use super::layout::{ElementId, LayoutError, LayoutTree};

/// Scale applied to a focused item
pub const FOCUS_SCALE: f32 = 2.0;
/// Focus animation progress per second (1.0 = one second)
pub const FOCUS_ANIMATION_SPEED: f32 = 10.0;

#[derive(Debug, Clone, Copy)]
struct FocusedItem {
    item: ElementId,
    original_parent: ElementId,
    original_index: usize,
    original_position: Vec2,
    original_scale: f32,
}

#[derive(Debug, Clone, Copy)]
struct FocusAnimation {
    item: ElementId,
    from_position: Vec2,
    from_scale: f32,
    to_position: Vec2,
    to_scale: f32,
    t: f32,
}

/// Result of a click routed to the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusChange {
    Focused(ElementId),
    Unfocused(ElementId),
    Ignored,
}

/// Focus layer controller.
#[derive(Debug, Clone)]
pub struct FocusViewer {
    container: Option<ElementId>,
    dimmer: Option<ElementId>,
    focused: Option<FocusedItem>,
    animation: Option<FocusAnimation>,
    pub focus_scale: f32,
    pub animation_speed: f32,
}

impl FocusViewer {
    /// Create the viewer and hide the dimmer.
    pub fn new(
        tree: &mut LayoutTree,
        container: Option<ElementId>,
        dimmer: Option<ElementId>,
    ) -> Result<Self, LayoutError> {
        if container.is_none() {
            tracing::warn!("no focus container assigned; item focus disabled");
        }
        if let Some(dimmer) = dimmer {
            tree.set_active(dimmer, false)?;
        }
        Ok(Self {
            container,
            dimmer,
            focused: None,
            animation: None,
            focus_scale: FOCUS_SCALE,
            animation_speed: FOCUS_ANIMATION_SPEED,
        })
    }

    #[inline]
    pub fn focused_item(&self) -> Option<ElementId> {
        self.focused.map(|f| f.item)
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Route a click on `item`. Clicks that end a drag are ignored.
    pub fn click(
        &mut self,
        tree: &mut LayoutTree,
        item: ElementId,
        dragging: bool,
    ) -> Result<FocusChange, LayoutError> {
        if dragging {
            return Ok(FocusChange::Ignored);
        }
        if self.focused_item() == Some(item) {
            return self.unfocus(tree);
        }
        self.focus(tree, item)
    }

    /// Click on the dimmer: unfocus whatever is focused.
    pub fn dimmer_click(&mut self, tree: &mut LayoutTree) -> Result<FocusChange, LayoutError> {
        self.unfocus(tree)
    }

    pub fn focus(
        &mut self,
        tree: &mut LayoutTree,
        item: ElementId,
    ) -> Result<FocusChange, LayoutError> {
        let Some(container) = self.container.filter(|&c| tree.contains(c)) else {
            return Ok(FocusChange::Ignored);
        };
        if self.focused.is_some() {
            self.unfocus(tree)?;
        }

        let focused = FocusedItem {
            item,
            original_parent: tree.parent(item)?.ok_or(LayoutError::NoParent(item))?,
            original_index: tree.sibling_index(item)?,
            original_position: tree.local_position(item)?,
            original_scale: tree.scale(item)?,
        };

        tree.reparent(item, container)?;
        tree.set_draggable(item, false)?;

        if let Some(dimmer) = self.dimmer.filter(|&d| tree.contains(d)) {
            tree.set_active(dimmer, true)?;
            // Dimmer above the journal, focus layer above the dimmer
            tree.move_to_last(dimmer)?;
            tree.move_to_last(container)?;
        }

        self.focused = Some(focused);
        self.animate(tree, item, Vec2::ZERO, self.focus_scale)?;
        Ok(FocusChange::Focused(item))
    }

    pub fn unfocus(&mut self, tree: &mut LayoutTree) -> Result<FocusChange, LayoutError> {
        let Some(focused) = self.focused.take() else {
            return Ok(FocusChange::Ignored);
        };
        self.hide_dimmer(tree)?;

        tree.reparent(focused.item, focused.original_parent)?;
        tree.set_sibling_index(focused.item, focused.original_index)?;
        tree.set_draggable(focused.item, true)?;

        self.animate(
            tree,
            focused.item,
            focused.original_position,
            focused.original_scale,
        )?;
        Ok(FocusChange::Unfocused(focused.item))
    }

    /// Drop any focus state for an element that is being destroyed.
    pub fn forget(&mut self, tree: &mut LayoutTree, item: ElementId) -> Result<(), LayoutError> {
        if self.focused_item() == Some(item) {
            self.focused = None;
            self.hide_dimmer(tree)?;
        }
        if self.animation.is_some_and(|a| a.item == item) {
            self.animation = None;
        }
        Ok(())
    }

    /// Jump `item` to the end of its focus animation, if it has one running.
    pub fn settle(&mut self, tree: &mut LayoutTree, item: ElementId) -> Result<(), LayoutError> {
        let Some(anim) = self.animation.filter(|a| a.item == item) else {
            return Ok(());
        };
        self.animation = None;
        if tree.contains(item) {
            tree.set_local_position(item, anim.to_position)?;
            tree.set_scale(item, anim.to_scale)?;
        }
        Ok(())
    }

    /// Advance the focus animation.
    pub fn tick(&mut self, tree: &mut LayoutTree, dt: f32) -> Result<(), LayoutError> {
        let Some(anim) = self.animation.as_mut() else {
            return Ok(());
        };
        if !tree.contains(anim.item) {
            self.animation = None;
            return Ok(());
        }

        anim.t += dt * self.animation_speed;
        let t = anim.t.min(1.0);
        let position = anim.from_position.lerp(anim.to_position, t);
        let scale = anim.from_scale + (anim.to_scale - anim.from_scale) * t;
        let item = anim.item;
        let finished = anim.t >= 1.0;

        tree.set_local_position(item, position)?;
        tree.set_scale(item, scale)?;
        if finished {
            self.animation = None;
        }
        Ok(())
    }

    fn animate(
        &mut self,
        tree: &LayoutTree,
        item: ElementId,
        to_position: Vec2,
        to_scale: f32,
    ) -> Result<(), LayoutError> {
        self.animation = Some(FocusAnimation {
            item,
            from_position: tree.local_position(item)?,
            from_scale: tree.scale(item)?,
            to_position,
            to_scale,
            t: 0.0,
        });
        Ok(())
    }

    fn hide_dimmer(&self, tree: &mut LayoutTree) -> Result<(), LayoutError> {
        match self.dimmer.filter(|&d| tree.contains(d)) {
            Some(dimmer) => tree.set_active(dimmer, false),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::layout::ContainerRole;

    struct Fixture {
        tree: LayoutTree,
        page: ElementId,
        focus: ElementId,
        dimmer: ElementId,
        item: ElementId,
    }

    fn fixture() -> Fixture {
        let mut tree = LayoutTree::new(Vec2::new(800.0, 600.0), 1.0);
        let root = tree.root();
        let page = tree
            .add_container(root, "Page", ContainerRole::Page, Vec2::ZERO, Vec2::splat(400.0))
            .unwrap();
        let focus = tree
            .add_element(root, "FocusContainer", Vec2::new(400.0, 300.0), Vec2::ZERO)
            .unwrap();
        let dimmer = tree
            .add_element(root, "FocusDimmer", Vec2::ZERO, Vec2::new(800.0, 600.0))
            .unwrap();
        tree.add_element(page, "Other", Vec2::ZERO, Vec2::splat(10.0)).unwrap();
        let item = tree
            .add_element(page, "Photo", Vec2::new(20.0, 30.0), Vec2::splat(50.0))
            .unwrap();
        Fixture {
            tree,
            page,
            focus,
            dimmer,
            item,
        }
    }

    #[test]
    fn test_focus_animates_to_layer_origin() {
        let mut f = fixture();
        let mut viewer = FocusViewer::new(&mut f.tree, Some(f.focus), Some(f.dimmer)).unwrap();
        assert!(!f.tree.is_active(f.dimmer).unwrap());

        let change = viewer.click(&mut f.tree, f.item, false).unwrap();
        assert_eq!(change, FocusChange::Focused(f.item));
        assert_eq!(f.tree.parent(f.item).unwrap(), Some(f.focus));
        assert!(f.tree.is_active(f.dimmer).unwrap());
        assert!(!f.tree.is_draggable(f.item).unwrap());

        // speed 10 → finished after 0.1s
        viewer.tick(&mut f.tree, 0.05).unwrap();
        assert!(viewer.is_animating());
        viewer.tick(&mut f.tree, 0.06).unwrap();
        assert!(!viewer.is_animating());
        assert_eq!(f.tree.local_position(f.item).unwrap(), Vec2::ZERO);
        assert_eq!(f.tree.scale(f.item).unwrap(), FOCUS_SCALE);
    }

    #[test]
    fn test_unfocus_restores_parent_order_and_pose() {
        let mut f = fixture();
        let mut viewer = FocusViewer::new(&mut f.tree, Some(f.focus), Some(f.dimmer)).unwrap();
        viewer.click(&mut f.tree, f.item, false).unwrap();
        viewer.tick(&mut f.tree, 1.0).unwrap();

        let change = viewer.dimmer_click(&mut f.tree).unwrap();
        assert_eq!(change, FocusChange::Unfocused(f.item));
        viewer.tick(&mut f.tree, 1.0).unwrap();

        assert_eq!(f.tree.parent(f.item).unwrap(), Some(f.page));
        assert_eq!(f.tree.sibling_index(f.item).unwrap(), 1);
        assert_eq!(f.tree.local_position(f.item).unwrap(), Vec2::new(20.0, 30.0));
        assert_eq!(f.tree.scale(f.item).unwrap(), 1.0);
        assert!(f.tree.is_draggable(f.item).unwrap());
        assert!(!f.tree.is_active(f.dimmer).unwrap());
    }

    #[test]
    fn test_click_while_dragging_ignored() {
        let mut f = fixture();
        let mut viewer = FocusViewer::new(&mut f.tree, Some(f.focus), None).unwrap();
        assert_eq!(viewer.click(&mut f.tree, f.item, true).unwrap(), FocusChange::Ignored);
        assert_eq!(viewer.focused_item(), None);
    }

    #[test]
    fn test_missing_container_disables_focus() {
        let mut f = fixture();
        let mut viewer = FocusViewer::new(&mut f.tree, None, Some(f.dimmer)).unwrap();
        assert_eq!(viewer.click(&mut f.tree, f.item, false).unwrap(), FocusChange::Ignored);
        assert_eq!(f.tree.parent(f.item).unwrap(), Some(f.page));
    }

    #[test]
    fn test_forget_clears_dimmer() {
        let mut f = fixture();
        let mut viewer = FocusViewer::new(&mut f.tree, Some(f.focus), Some(f.dimmer)).unwrap();
        viewer.click(&mut f.tree, f.item, false).unwrap();
        viewer.forget(&mut f.tree, f.item).unwrap();

        assert_eq!(viewer.focused_item(), None);
        assert!(!viewer.is_animating());
        assert!(!f.tree.is_active(f.dimmer).unwrap());
    }

    #[test]
    fn test_settle_finishes_return_animation() {
        let mut f = fixture();
        let mut viewer = FocusViewer::new(&mut f.tree, Some(f.focus), Some(f.dimmer)).unwrap();
        viewer.click(&mut f.tree, f.item, false).unwrap();
        viewer.tick(&mut f.tree, 1.0).unwrap();
        viewer.dimmer_click(&mut f.tree).unwrap();
        assert!(viewer.is_animating());

        viewer.settle(&mut f.tree, f.item).unwrap();
        assert!(!viewer.is_animating());
        assert_eq!(f.tree.local_position(f.item).unwrap(), Vec2::new(20.0, 30.0));
        assert_eq!(f.tree.scale(f.item).unwrap(), 1.0);

        // Later ticks leave the item alone
        f.tree.set_local_position(f.item, Vec2::new(5.0, 5.0)).unwrap();
        viewer.tick(&mut f.tree, 0.016).unwrap();
        assert_eq!(f.tree.local_position(f.item).unwrap(), Vec2::new(5.0, 5.0));
    }
}
