//! Collision primitives
//!
//! Everything on the lawn collides as an axis-aligned box, except sun tokens,
//! which use a circular pointer hit test.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    /// Box of half-extent `radius` centered on `center`
    pub fn around(center: Vec2, radius: f32) -> Self {
        Self {
            min: center - Vec2::splat(radius),
            size: Vec2::splat(radius * 2.0),
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Strict overlap test (touching edges do not count)
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x && a_max.x > other.min.x && self.min.y < b_max.y && a_max.y > other.min.y
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.min.x && point.x <= max.x && point.y >= self.min.y && point.y <= max.y
    }
}

/// Circular hit test with extra slack around the circle
#[inline]
pub fn circle_hit(center: Vec2, radius: f32, tolerance: f32, point: Vec2) -> bool {
    center.distance(point) <= radius + tolerance
}

/// Coarse horizontal pre-filter before an exact box test
#[inline]
pub fn within_x(a: f32, b: f32, range: f32) -> bool {
    (a - b).abs() <= range
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Aabb::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Aabb::new(10.0, 0.0, 10.0, 10.0)), "touching is not overlapping");
        assert!(!a.overlaps(&Aabb::new(0.0, 20.0, 10.0, 10.0)));
    }

    #[test]
    fn test_around_is_centered() {
        let b = Aabb::around(Vec2::new(50.0, 50.0), 10.0);
        assert_eq!(b.min, Vec2::new(40.0, 40.0));
        assert_eq!(b.max(), Vec2::new(60.0, 60.0));
        assert!(b.contains(Vec2::new(60.0, 45.0)));
    }

    #[test]
    fn test_circle_hit_tolerance() {
        let c = Vec2::new(100.0, 100.0);
        assert!(circle_hit(c, 25.0, 10.0, Vec2::new(135.0, 100.0)));
        assert!(!circle_hit(c, 25.0, 10.0, Vec2::new(136.0, 100.0)));
    }
}
