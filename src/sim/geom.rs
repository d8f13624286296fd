//! Axis-aligned bounds for overlap tests
//!
//! Bounds are derived from an entity's center and size. Overlap is strict:
//! rectangles that only share an edge do not collide.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{KILL_MARGIN, SCREEN_HEIGHT, SCREEN_WIDTH};

/// Screen-space rectangle (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Bounds {
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            left: center.x - half.x,
            top: center.y - half.y,
            right: center.x + half.x,
            bottom: center.y + half.y,
        }
    }

    /// Strict rectangle intersection
    #[inline]
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }

    /// Whether a point lies strictly inside the horizontal extent
    #[inline]
    pub fn spans_x(&self, x: f32) -> bool {
        x > self.left && x < self.right
    }

    /// True once the rectangle has fully left the playfield (with the top kill margin)
    pub fn outside_playfield(&self) -> bool {
        self.left > SCREEN_WIDTH
            || self.top > SCREEN_HEIGHT
            || self.right < 0.0
            || self.bottom < -KILL_MARGIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_is_strict() {
        let a = Bounds::from_center(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        // Touching on the right edge only
        let b = Bounds::from_center(Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0));
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));

        let c = Bounds::from_center(Vec2::new(9.9, 0.0), Vec2::new(10.0, 10.0));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&a));
    }

    #[test]
    fn test_containment_overlaps() {
        let outer = Bounds::from_center(Vec2::new(320.0, 320.0), Vec2::new(640.0, 60.0));
        let inner = Bounds::from_center(Vec2::new(100.0, 330.0), Vec2::new(10.0, 10.0));
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
        assert_eq!(outer.left, 0.0);
        assert_eq!(outer.bottom, 350.0);
    }

    #[test]
    fn test_outside_playfield() {
        let size = Vec2::new(20.0, 20.0);
        assert!(!Bounds::from_center(Vec2::new(320.0, -25.0), size).outside_playfield());
        assert!(Bounds::from_center(Vec2::new(320.0, -55.0), size).outside_playfield());
        assert!(Bounds::from_center(Vec2::new(320.0, 655.0), size).outside_playfield());
        assert!(Bounds::from_center(Vec2::new(-15.0, 300.0), size).outside_playfield());
        assert!(Bounds::from_center(Vec2::new(655.0, 300.0), size).outside_playfield());
    }
}
