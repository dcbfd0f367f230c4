//! Axis-aligned box geometry for players, platforms and buffs
//!
//! Screen coordinates: x grows to the right, y grows downwards, so the "top"
//! of a box is its smallest y.

use glam::Vec2;

/// An axis-aligned bounding box given by its top-left and bottom-right corners
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Box from a top-left location and a (non-negative) size
    pub fn new(location: Vec2, size: Vec2) -> Self {
        Self {
            min: location,
            max: location + size,
        }
    }

    /// Square box with the given side length
    pub fn square(location: Vec2, side: f32) -> Self {
        Self::new(location, Vec2::splat(side))
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.max.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.max.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// The same box moved by `offset`
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Overlap test with inclusive bounds (touching edges count)
    pub fn overlaps_inclusive(&self, other: &Aabb) -> bool {
        self.right() >= other.left()
            && self.left() <= other.right()
            && self.bottom() >= other.top()
            && self.top() <= other.bottom()
    }
}

/// Turn a possibly negative extent into a top-left origin and positive size
///
/// Dragging a platform up or to the left produces negative sizes; the origin
/// moves so the covered area stays the same.
pub fn normalize_extent(location: Vec2, size: Vec2) -> (Vec2, Vec2) {
    let mut origin = location;
    let mut extent = size;
    if extent.x < 0.0 {
        origin.x += extent.x;
        extent.x = -extent.x;
    }
    if extent.y < 0.0 {
        origin.y += extent.y;
        extent.y = -extent.y;
    }
    (origin, extent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touching_edges_overlap() {
        let a = Aabb::square(Vec2::ZERO, 10.0);
        let b = Aabb::square(Vec2::new(10.0, 0.0), 10.0);
        assert!(a.overlaps_inclusive(&b));
        assert!(b.overlaps_inclusive(&a));
    }

    #[test]
    fn test_separated_boxes_do_not_overlap() {
        let a = Aabb::square(Vec2::ZERO, 10.0);
        let b = Aabb::square(Vec2::new(10.5, 0.0), 10.0);
        assert!(!a.overlaps_inclusive(&b));

        let c = Aabb::square(Vec2::new(0.0, 11.0), 10.0);
        assert!(!a.overlaps_inclusive(&c));
    }

    #[test]
    fn test_contained_box_overlaps() {
        let outer = Aabb::square(Vec2::ZERO, 45.0);
        let inner = Aabb::new(Vec2::new(30.0, 30.0), Vec2::new(10.0, 10.0));
        assert!(outer.overlaps_inclusive(&inner));
        assert!(inner.overlaps_inclusive(&outer));
    }

    #[test]
    fn test_translated_and_center() {
        let a = Aabb::square(Vec2::ZERO, 10.0).translated(Vec2::new(5.0, -5.0));
        assert_eq!(a.min, Vec2::new(5.0, -5.0));
        assert_eq!(a.max, Vec2::new(15.0, 5.0));
        assert_eq!(a.center(), Vec2::new(10.0, 0.0));
    }

    #[test]
    fn test_normalize_negative_extent() {
        let (origin, size) = normalize_extent(Vec2::new(100.0, 50.0), Vec2::new(-40.0, -10.0));
        assert_eq!(origin, Vec2::new(60.0, 40.0));
        assert_eq!(size, Vec2::new(40.0, 10.0));

        let (origin, size) = normalize_extent(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0));
        assert_eq!(origin, Vec2::new(1.0, 2.0));
        assert_eq!(size, Vec2::new(3.0, 4.0));
    }
}
