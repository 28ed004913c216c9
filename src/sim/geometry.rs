//! Axis-aligned geometry for entities and the play field
//!
//! Every entity is a top-left anchored rectangle in screen space
//! (x grows right, y grows down).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Top-left corner
    pub min: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// Bottom-right corner
    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Strict overlap test: rectangles that only share an edge do not collide
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x && other.min.x < a_max.x && self.min.y < b_max.y && other.min.y < a_max.y
    }
}

/// Play-field bounds used for clamping and removal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

impl Default for Field {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
        }
    }
}

impl Field {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Clamp a rectangle's top-left corner so the rectangle stays inside the
    /// field. Each axis is clamped independently.
    pub fn clamp(&self, pos: Vec2, size: Vec2) -> Vec2 {
        Vec2::new(
            pos.x.clamp(0.0, (self.width - size.x).max(0.0)),
            pos.y.clamp(0.0, (self.height - size.y).max(0.0)),
        )
    }

    /// True if a point lies inside the field (edges inclusive)
    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x >= 0.0 && pos.x <= self.width && pos.y >= 0.0 && pos.y <= self.height
    }

    /// True if a rectangle at `x` with `width` touches or crosses either
    /// horizontal bound
    pub fn touches_side(&self, x: f32, width: f32) -> bool {
        x <= 0.0 || x >= self.width - width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Aabb {
        Aabb::new(Vec2::new(x, y), Vec2::new(w, h))
    }

    #[test]
    fn test_overlap() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&rect(5.0, 5.0, 10.0, 10.0)));
        assert!(a.overlaps(&rect(2.0, 2.0, 1.0, 1.0)));
        assert!(!a.overlaps(&rect(20.0, 0.0, 5.0, 5.0)));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&rect(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.overlaps(&rect(0.0, 10.0, 10.0, 10.0)));
    }

    #[test]
    fn test_clamp_each_axis() {
        let field = Field::default();
        let size = Vec2::new(50.0, 40.0);
        assert_eq!(field.clamp(Vec2::new(-3.0, 700.0), size), Vec2::new(0.0, 560.0));
        assert_eq!(field.clamp(Vec2::new(900.0, -1.0), size), Vec2::new(750.0, 0.0));
        assert_eq!(field.clamp(Vec2::new(10.0, 20.0), size), Vec2::new(10.0, 20.0));
    }

    #[test]
    fn test_contains_and_sides() {
        let field = Field::default();
        assert!(field.contains(Vec2::new(0.0, 600.0)));
        assert!(!field.contains(Vec2::new(-0.1, 10.0)));
        assert!(!field.contains(Vec2::new(10.0, 600.5)));
        assert!(field.touches_side(0.0, 40.0));
        assert!(field.touches_side(760.0, 40.0));
        assert!(!field.touches_side(400.0, 40.0));
    }
}
