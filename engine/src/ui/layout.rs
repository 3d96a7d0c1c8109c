//! Journal Layout Tree
//!
//! An explicit scene graph for the journal UI: every element has a parent, an
//! ordered child list (order = stacking order, last drawn on top), a local
//! position relative to its parent's origin, a size and a scale.
//!
//! Drop zones are registered in a role table (`ElementId -> ContainerRole`)
//! instead of being recognised by name, and hierarchy walks stop at the root
//! canvas, which is never itself a container.
//!
//! # Coordinates
//!
//! Screen space is y-up with the origin at the bottom-left. An element's
//! origin is its bottom-left corner. The root canvas applies the view's scale
//! factor, so layout units times `scale_factor` give screen pixels.
//!
//! # Element lifetime
//!
//! Slots freed by [`LayoutTree::remove`] are reused by later insertions, so
//! the arena stays as large as the most elements alive at once. Each slot
//! carries a generation; an id kept after its element was removed never
//! resolves to the element that later reuses the slot.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::geometry::ScreenRect;

/// Handle to an element in a [`LayoutTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId {
    index: u32,
    generation: u32,
}

impl ElementId {
    /// Arena slot of the element
    #[inline]
    pub fn index(self) -> u32 {
        self.index
    }

    /// Number of times the slot had been freed when this id was issued
    #[inline]
    pub fn generation(self) -> u32 {
        self.generation
    }
}

/// Role of a drop container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerRole {
    /// A journal page that keeps items placed on it
    Page,
    /// Holding area for new captures and notes
    Staging,
    /// Dropping here asks for the item to be deleted
    Trash,
}

/// Visual state the view layer applies to an element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragVisual {
    pub alpha: f32,
    /// Whether pointer hit-testing can land on this element
    pub blocks_raycasts: bool,
}

impl DragVisual {
    pub const RESTING: Self = Self {
        alpha: 1.0,
        blocks_raycasts: true,
    };

    /// Semi-transparent and ignored by hit-testing while being dragged.
    pub fn lifted(alpha: f32) -> Self {
        Self {
            alpha,
            blocks_raycasts: false,
        }
    }
}

impl Default for DragVisual {
    fn default() -> Self {
        Self::RESTING
    }
}

/// Errors from layout tree operations.
#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    #[error("unknown element {0:?}")]
    UnknownElement(ElementId),
    #[error("element {0:?} has no parent")]
    NoParent(ElementId),
    #[error("cannot parent {element:?} under its own descendant {parent:?}")]
    Cycle {
        element: ElementId,
        parent: ElementId,
    },
    #[error("degenerate element size {width}x{height}")]
    InvalidSize { width: f32, height: f32 },
}

/// Finds the nearest registered container above a hit element.
pub trait ContainerLookup {
    /// Walk from `hit` toward the root and return the first element whose
    /// role is in `roles`. The root canvas ends the walk unchecked.
    fn nearest_container(&self, hit: ElementId, roles: &[ContainerRole]) -> Option<ElementId>;
}

/// Reports element corners in shared screen space.
pub trait GeometryProvider {
    /// Corners in order bottom-left, top-left, top-right, bottom-right.
    fn world_corners(&self, element: ElementId) -> Option<[Vec2; 4]>;
}

#[derive(Debug, Clone)]
struct Node {
    name: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    local_position: Vec2,
    size: Vec2,
    scale: f32,
    visual: DragVisual,
    draggable: bool,
    active: bool,
}

impl Node {
    fn new(name: &str, parent: Option<ElementId>, local_position: Vec2, size: Vec2) -> Self {
        Self {
            name: name.to_owned(),
            parent,
            children: Vec::new(),
            local_position,
            size,
            scale: 1.0,
            visual: DragVisual::RESTING,
            draggable: true,
            active: true,
        }
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Element arena with parent/child links and the container role registry.
#[derive(Debug, Clone)]
pub struct LayoutTree {
    slots: Vec<Slot>,
    /// Indices of empty slots, reused before the arena grows
    free: Vec<u32>,
    root: ElementId,
    roles: HashMap<ElementId, ContainerRole>,
    /// Screen pixels per layout unit
    scale_factor: f32,
}

impl LayoutTree {
    /// Create a tree whose root canvas covers `screen_size` pixels.
    pub fn new(screen_size: Vec2, scale_factor: f32) -> Self {
        let scale_factor = if scale_factor > 0.0 { scale_factor } else { 1.0 };
        let root = Node::new("Canvas", None, Vec2::ZERO, screen_size / scale_factor);
        Self {
            slots: vec![Slot {
                generation: 0,
                node: Some(root),
            }],
            free: Vec::new(),
            root: ElementId {
                index: 0,
                generation: 0,
            },
            roles: HashMap::new(),
            scale_factor,
        }
    }

    #[inline]
    pub fn root(&self) -> ElementId {
        self.root
    }

    #[inline]
    pub fn scale_factor(&self) -> f32 {
        self.scale_factor
    }

    /// Change the canvas scale factor. Non-positive values are ignored.
    pub fn set_scale_factor(&mut self, scale_factor: f32) {
        if scale_factor > 0.0 {
            self.scale_factor = scale_factor;
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Number of slots allocated, live or free.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn node(&self, id: ElementId) -> Result<&Node, LayoutError> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
            .ok_or(LayoutError::UnknownElement(id))
    }

    fn node_mut(&mut self, id: ElementId) -> Result<&mut Node, LayoutError> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
            .ok_or(LayoutError::UnknownElement(id))
    }

    #[inline]
    pub fn contains(&self, id: ElementId) -> bool {
        self.node(id).is_ok()
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Append a new element as the last child of `parent`.
    pub fn add_element(
        &mut self,
        parent: ElementId,
        name: &str,
        local_position: Vec2,
        size: Vec2,
    ) -> Result<ElementId, LayoutError> {
        if size.x < 0.0 || size.y < 0.0 {
            return Err(LayoutError::InvalidSize {
                width: size.x,
                height: size.y,
            });
        }
        self.node(parent)?;

        let node = Node::new(name, Some(parent), local_position, size);
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(node);
                ElementId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                ElementId {
                    index: (self.slots.len() - 1) as u32,
                    generation: 0,
                }
            }
        };
        self.node_mut(parent)?.children.push(id);
        Ok(id)
    }

    /// Append a new element and register it as a drop container.
    pub fn add_container(
        &mut self,
        parent: ElementId,
        name: &str,
        role: ContainerRole,
        local_position: Vec2,
        size: Vec2,
    ) -> Result<ElementId, LayoutError> {
        let id = self.add_element(parent, name, local_position, size)?;
        self.roles.insert(id, role);
        Ok(id)
    }

    /// Register (or re-register) an element as a drop container.
    pub fn set_role(&mut self, id: ElementId, role: ContainerRole) -> Result<(), LayoutError> {
        self.node(id)?;
        self.roles.insert(id, role);
        Ok(())
    }

    #[inline]
    pub fn role_of(&self, id: ElementId) -> Option<ContainerRole> {
        self.roles.get(&id).copied()
    }

    /// Remove an element and its whole subtree. Returns the removed ids,
    /// the element itself first.
    pub fn remove(&mut self, id: ElementId) -> Result<Vec<ElementId>, LayoutError> {
        if id == self.root {
            return Err(LayoutError::NoParent(id));
        }
        self.detach(id)?;

        let mut removed = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let Ok(node) = self.node(next) else {
                continue;
            };
            stack.extend(node.children.iter().copied());
            let slot = &mut self.slots[next.index as usize];
            slot.node = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(next.index);
            self.roles.remove(&next);
            removed.push(next);
        }
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn name(&self, id: ElementId) -> Result<&str, LayoutError> {
        Ok(self.node(id)?.name.as_str())
    }

    pub fn parent(&self, id: ElementId) -> Result<Option<ElementId>, LayoutError> {
        Ok(self.node(id)?.parent)
    }

    pub fn children(&self, id: ElementId) -> Result<&[ElementId], LayoutError> {
        Ok(&self.node(id)?.children)
    }

    /// Position of `id` among its siblings (0 = drawn first).
    pub fn sibling_index(&self, id: ElementId) -> Result<usize, LayoutError> {
        let parent = self.node(id)?.parent.ok_or(LayoutError::NoParent(id))?;
        self.node(parent)?
            .children
            .iter()
            .position(|&c| c == id)
            .ok_or(LayoutError::NoParent(id))
    }

    pub fn local_position(&self, id: ElementId) -> Result<Vec2, LayoutError> {
        Ok(self.node(id)?.local_position)
    }

    pub fn set_local_position(&mut self, id: ElementId, position: Vec2) -> Result<(), LayoutError> {
        self.node_mut(id)?.local_position = position;
        Ok(())
    }

    pub fn size(&self, id: ElementId) -> Result<Vec2, LayoutError> {
        Ok(self.node(id)?.size)
    }

    pub fn scale(&self, id: ElementId) -> Result<f32, LayoutError> {
        Ok(self.node(id)?.scale)
    }

    pub fn set_scale(&mut self, id: ElementId, scale: f32) -> Result<(), LayoutError> {
        self.node_mut(id)?.scale = scale;
        Ok(())
    }

    pub fn visual(&self, id: ElementId) -> Result<DragVisual, LayoutError> {
        Ok(self.node(id)?.visual)
    }

    pub fn set_visual(&mut self, id: ElementId, visual: DragVisual) -> Result<(), LayoutError> {
        self.node_mut(id)?.visual = visual;
        Ok(())
    }

    pub fn is_draggable(&self, id: ElementId) -> Result<bool, LayoutError> {
        Ok(self.node(id)?.draggable)
    }

    pub fn set_draggable(&mut self, id: ElementId, draggable: bool) -> Result<(), LayoutError> {
        self.node_mut(id)?.draggable = draggable;
        Ok(())
    }

    pub fn is_active(&self, id: ElementId) -> Result<bool, LayoutError> {
        Ok(self.node(id)?.active)
    }

    pub fn set_active(&mut self, id: ElementId, active: bool) -> Result<(), LayoutError> {
        self.node_mut(id)?.active = active;
        Ok(())
    }

    /// Whether `id` is `ancestor` or lies somewhere below it.
    pub fn is_descendant_of(&self, id: ElementId, ancestor: ElementId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.node(c).ok().and_then(|n| n.parent);
        }
        false
    }

    /// Accumulated scale from the canvas down to `id`, in pixels per unit.
    pub fn world_scale(&self, id: ElementId) -> Result<f32, LayoutError> {
        let mut scale = self.scale_factor;
        let mut current = Some(id);
        while let Some(c) = current {
            let node = self.node(c)?;
            scale *= node.scale;
            current = node.parent;
        }
        Ok(scale)
    }

    /// Screen-space position of the element's bottom-left corner.
    pub fn world_origin(&self, id: ElementId) -> Result<Vec2, LayoutError> {
        let node = self.node(id)?;
        match node.parent {
            None => Ok(node.local_position * self.scale_factor),
            Some(parent) => {
                Ok(self.world_origin(parent)? + node.local_position * self.world_scale(parent)?)
            }
        }
    }

    /// Screen-space rectangle covered by the element.
    pub fn world_rect(&self, id: ElementId) -> Result<ScreenRect, LayoutError> {
        let origin = self.world_origin(id)?;
        let size = self.node(id)?.size * self.world_scale(id)?;
        Ok(ScreenRect::from_origin_size(origin, size))
    }

    // ------------------------------------------------------------------
    // Re-parenting
    // ------------------------------------------------------------------

    fn detach(&mut self, id: ElementId) -> Result<(), LayoutError> {
        if let Some(parent) = self.node(id)?.parent {
            self.node_mut(parent)?.children.retain(|&c| c != id);
        }
        self.node_mut(id)?.parent = None;
        Ok(())
    }

    fn check_parent(&self, id: ElementId, parent: ElementId) -> Result<(), LayoutError> {
        self.node(id)?;
        self.node(parent)?;
        if self.is_descendant_of(parent, id) {
            return Err(LayoutError::Cycle {
                element: id,
                parent,
            });
        }
        Ok(())
    }

    /// Move `id` to the end of `parent`'s children, keeping its screen position.
    pub fn reparent(&mut self, id: ElementId, parent: ElementId) -> Result<(), LayoutError> {
        self.check_parent(id, parent)?;
        let world = self.world_origin(id)?;

        self.detach(id)?;
        let local = (world - self.world_origin(parent)?) / self.world_scale(parent)?;
        self.node_mut(parent)?.children.push(id);

        let node = self.node_mut(id)?;
        node.parent = Some(parent);
        node.local_position = local;
        Ok(())
    }

    /// Put `id` under `parent` at `index` (clamped) with an exact local position.
    pub fn insert_at(
        &mut self,
        id: ElementId,
        parent: ElementId,
        index: usize,
        local_position: Vec2,
    ) -> Result<(), LayoutError> {
        self.check_parent(id, parent)?;
        self.detach(id)?;

        let siblings = &mut self.node_mut(parent)?.children;
        let index = index.min(siblings.len());
        siblings.insert(index, id);

        let node = self.node_mut(id)?;
        node.parent = Some(parent);
        node.local_position = local_position;
        Ok(())
    }

    /// Move `id` to `index` (clamped) within its current parent.
    pub fn set_sibling_index(&mut self, id: ElementId, index: usize) -> Result<(), LayoutError> {
        let parent = self.node(id)?.parent.ok_or(LayoutError::NoParent(id))?;
        let position = self.node(id)?.local_position;
        self.insert_at(id, parent, index, position)
    }

    /// Draw `id` above all of its siblings.
    pub fn move_to_last(&mut self, id: ElementId) -> Result<(), LayoutError> {
        self.set_sibling_index(id, usize::MAX)
    }
}

impl ContainerLookup for LayoutTree {
    fn nearest_container(&self, hit: ElementId, roles: &[ContainerRole]) -> Option<ElementId> {
        let mut current = hit;
        while current != self.root {
            if self.role_of(current).is_some_and(|role| roles.contains(&role)) {
                return Some(current);
            }
            current = self.node(current).ok()?.parent?;
        }
        None
    }
}

impl GeometryProvider for LayoutTree {
    fn world_corners(&self, element: ElementId) -> Option<[Vec2; 4]> {
        self.world_rect(element).ok().map(|rect| rect.corners())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> LayoutTree {
        LayoutTree::new(Vec2::new(1000.0, 800.0), 1.0)
    }

    #[test]
    fn test_world_origin_accumulates() {
        let mut t = tree();
        let page = t
            .add_container(
                t.root(),
                "Page",
                ContainerRole::Page,
                Vec2::new(100.0, 50.0),
                Vec2::new(400.0, 300.0),
            )
            .unwrap();
        let item = t
            .add_element(page, "Item", Vec2::new(10.0, 20.0), Vec2::new(30.0, 40.0))
            .unwrap();

        assert_eq!(t.world_origin(item).unwrap(), Vec2::new(110.0, 70.0));
        let rect = t.world_rect(item).unwrap();
        assert_eq!(rect.max, Vec2::new(140.0, 110.0));
    }

    #[test]
    fn test_scale_factor_scales_world_space() {
        let mut t = LayoutTree::new(Vec2::new(2000.0, 1600.0), 2.0);
        let item = t
            .add_element(t.root(), "Item", Vec2::new(10.0, 10.0), Vec2::new(5.0, 5.0))
            .unwrap();
        let rect = t.world_rect(item).unwrap();
        assert_eq!(rect.min, Vec2::new(20.0, 20.0));
        assert_eq!(rect.max, Vec2::new(30.0, 30.0));
        assert_eq!(t.size(t.root()).unwrap(), Vec2::new(1000.0, 800.0));
    }

    #[test]
    fn test_reparent_keeps_world_position() {
        let mut t = tree();
        let a = t.add_element(t.root(), "A", Vec2::new(100.0, 100.0), Vec2::splat(200.0)).unwrap();
        let b = t.add_element(t.root(), "B", Vec2::new(500.0, 100.0), Vec2::splat(200.0)).unwrap();
        let item = t.add_element(a, "Item", Vec2::new(10.0, 10.0), Vec2::splat(20.0)).unwrap();

        t.reparent(item, b).unwrap();
        assert_eq!(t.parent(item).unwrap(), Some(b));
        assert_eq!(t.world_origin(item).unwrap(), Vec2::new(110.0, 110.0));
        assert_eq!(t.local_position(item).unwrap(), Vec2::new(-390.0, 10.0));
    }

    #[test]
    fn test_insert_at_clamps_index() {
        let mut t = tree();
        let a = t.add_element(t.root(), "A", Vec2::ZERO, Vec2::splat(10.0)).unwrap();
        let x = t.add_element(t.root(), "X", Vec2::ZERO, Vec2::splat(1.0)).unwrap();
        t.insert_at(x, a, 99, Vec2::new(3.0, 4.0)).unwrap();
        assert_eq!(t.sibling_index(x).unwrap(), 0);
        assert_eq!(t.local_position(x).unwrap(), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_cycle_rejected() {
        let mut t = tree();
        let a = t.add_element(t.root(), "A", Vec2::ZERO, Vec2::splat(10.0)).unwrap();
        let b = t.add_element(a, "B", Vec2::ZERO, Vec2::splat(10.0)).unwrap();
        assert_eq!(
            t.reparent(a, b),
            Err(LayoutError::Cycle { element: a, parent: b })
        );
    }

    #[test]
    fn test_nearest_container_stops_at_root() {
        let mut t = tree();
        let page = t
            .add_container(t.root(), "Page", ContainerRole::Page, Vec2::ZERO, Vec2::splat(100.0))
            .unwrap();
        let frame = t.add_element(page, "Frame", Vec2::ZERO, Vec2::splat(50.0)).unwrap();
        let loose = t.add_element(t.root(), "Loose", Vec2::ZERO, Vec2::splat(50.0)).unwrap();

        assert_eq!(t.nearest_container(frame, &[ContainerRole::Page]), Some(page));
        assert_eq!(t.nearest_container(frame, &[ContainerRole::Trash]), None);
        assert_eq!(t.nearest_container(loose, &[ContainerRole::Page]), None);
        assert_eq!(t.nearest_container(t.root(), &[ContainerRole::Page]), None);
    }

    #[test]
    fn test_remove_drops_subtree_and_roles() {
        let mut t = tree();
        let page = t
            .add_container(t.root(), "Page", ContainerRole::Page, Vec2::ZERO, Vec2::splat(100.0))
            .unwrap();
        let item = t.add_element(page, "Item", Vec2::ZERO, Vec2::splat(10.0)).unwrap();

        let removed = t.remove(page).unwrap();
        assert_eq!(removed, vec![page, item]);
        assert!(!t.contains(item));
        assert_eq!(t.role_of(page), None);
        assert!(t.children(t.root()).unwrap().is_empty());
    }

    #[test]
    fn test_removed_slots_are_reused() {
        let mut t = tree();
        let inbox = t.add_element(t.root(), "Inbox", Vec2::ZERO, Vec2::splat(100.0)).unwrap();
        let first = t.add_element(inbox, "Polaroid", Vec2::ZERO, Vec2::splat(10.0)).unwrap();
        let capacity = t.capacity();

        for _ in 0..50 {
            let photo = t.add_element(inbox, "Polaroid", Vec2::ZERO, Vec2::splat(10.0)).unwrap();
            t.remove(photo).unwrap();
        }
        assert_eq!(t.capacity(), capacity + 1);
        assert_eq!(t.len(), 3);

        t.remove(first).unwrap();
        let second = t.add_element(inbox, "Polaroid", Vec2::ZERO, Vec2::splat(10.0)).unwrap();
        assert_eq!(second.index(), first.index());
        assert_ne!(second, first);
        assert!(!t.contains(first));
        assert_eq!(t.parent(first), Err(LayoutError::UnknownElement(first)));
        assert_eq!(t.parent(second).unwrap(), Some(inbox));
    }

    #[test]
    fn test_negative_size_rejected() {
        let mut t = tree();
        assert!(matches!(
            t.add_element(t.root(), "Bad", Vec2::ZERO, Vec2::new(-1.0, 5.0)),
            Err(LayoutError::InvalidSize { .. })
        ));
    }
}
