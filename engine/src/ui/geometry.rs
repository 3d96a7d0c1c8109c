//! Screen-Space Geometry
//!
//! Axis-aligned rectangles in the shared screen space that both dragged items
//! and drop containers are measured in.

use glam::Vec2;

/// Axis-aligned rectangle in screen space (y up).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl ScreenRect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self {
            min: origin,
            max: origin + size,
        }
    }

    /// Build the bounding rectangle of four corners.
    pub fn from_corners(corners: &[Vec2; 4]) -> Self {
        let min = corners.iter().copied().fold(Vec2::splat(f32::INFINITY), Vec2::min);
        let max = corners.iter().copied().fold(Vec2::splat(f32::NEG_INFINITY), Vec2::max);
        Self { min, max }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Corners in order bottom-left, top-left, top-right, bottom-right.
    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.min,
            Vec2::new(self.min.x, self.max.y),
            self.max,
            Vec2::new(self.max.x, self.min.y),
        ]
    }

    /// Inclusive point test.
    #[inline]
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Strict full containment: every corner of `item` must lie inside `container`
/// (edges inclusive). A single corner outside by any margin rejects.
pub fn is_fully_inside(item: &[Vec2; 4], container: &[Vec2; 4]) -> bool {
    // Container bounds from the bottom-left and top-right corners
    let bounds = ScreenRect::new(container[0], container[2]);
    item.iter().all(|&corner| bounds.contains_point(corner))
}
