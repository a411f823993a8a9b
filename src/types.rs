use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// User-defined opaque key carried by bodies and echoed in pair reports.
pub type ColKey = u64;

bitflags! {
    /// Faces of a box or tile cell.
    ///
    /// Used for touching flags, per-tile solid faces and a body's
    /// collision mask (an empty mask never collides).
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Faces: u32 {
        const LEFT = 0x0001;
        const RIGHT = 0x0010;
        const UP = 0x0100;
        const DOWN = 0x1000;
        const ANY = Self::LEFT.bits() | Self::RIGHT.bits() | Self::UP.bits() | Self::DOWN.bits();
    }
}

/// Result of a single narrowphase resolution.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum CollisionOutcome {
    /// No penetration.
    #[default]
    None,
    /// Corrected along a cardinal axis.
    Axis,
    /// Corrected along a slope normal or a corner radial.
    Other,
}

impl CollisionOutcome {
    pub fn is_hit(self) -> bool {
        !matches!(self, CollisionOutcome::None)
    }
}

/// Dominant direction of travel after the last step.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Facing {
    #[default]
    None,
    Left,
    Right,
    Up,
    Down,
}

/// Axis-aligned rectangle stored as (min, max). Y grows downward.
#[derive(Copy, Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Top-left corner plus size.
    pub fn from_xywh(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { min: Vec2::new(x, y), max: Vec2::new(x + w, y + h) }
    }

    pub fn from_center_half(center: Vec2, half: Vec2) -> Self {
        Self { min: center - half, max: center + half }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect { min: self.min.min(other.min), max: self.max.max(other.max) }
    }

    /// Strict overlap: rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.max.x > other.min.x
            && self.min.x < other.max.x
            && self.max.y > other.min.y
            && self.min.y < other.max.y
    }

    /// Inclusive overlap: shared edges count.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.max.x >= other.min.x
            && self.min.x <= other.max.x
            && self.max.y >= other.min.y
            && self.min.y <= other.max.y
    }

    /// True when `other` lies strictly inside `self`.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.min.x > self.min.x
            && other.max.x < self.max.x
            && other.min.y > self.min.y
            && other.max.y < self.max.y
    }
}

/// Debug statistics for the last quadtree pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct QuadTreeStats {
    pub nodes: usize,
    pub max_depth: usize,
    /// Object placements across all node lists (an object may sit in many nodes).
    pub entries: usize,
    /// Candidate pairs that reached the overlap test.
    pub pairs_tested: usize,
    /// Pairs whose process callback accepted them.
    pub pairs_reported: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges_touching_do_not_overlap() {
        let a = Rect::from_xywh(0.0, 0.0, 10.0, 10.0);
        let b = Rect::from_xywh(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        assert!(a.intersects(&b));
        let c = Rect::from_xywh(9.5, 9.5, 1.0, 1.0);
        assert!(a.overlaps(&c));
    }

    #[test]
    fn test_rect_union_and_contains() {
        let a = Rect::from_xywh(0.0, 0.0, 4.0, 4.0);
        let b = Rect::from_xywh(2.0, 3.0, 4.0, 4.0);
        let u = a.union(&b);
        assert_eq!(u, Rect::from_xywh(0.0, 0.0, 6.0, 7.0));
        assert!(u.contains_rect(&Rect::from_xywh(1.0, 1.0, 1.0, 1.0)));
        assert!(!u.contains_rect(&a));
    }

    #[test]
    fn test_faces_any_covers_all_sides() {
        assert!(Faces::ANY.contains(Faces::LEFT | Faces::RIGHT | Faces::UP | Faces::DOWN));
        assert!(Faces::empty().is_empty());
        assert!(CollisionOutcome::Axis.is_hit());
        assert!(!CollisionOutcome::None.is_hit());
    }
}
