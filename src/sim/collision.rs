//! Collision primitives
//!
//! Everything in the play area collides as an axis-aligned rectangle or a
//! circle. Two tests cover every pairing the tick needs.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle, `pos` is the top-left corner (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Bounding square of a circle
    pub fn around(center: Vec2, radius: f32) -> Self {
        Self {
            pos: center - Vec2::splat(radius),
            size: Vec2::splat(radius * 2.0),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Closest point inside the rectangle to `p`
    #[inline]
    pub fn clamp_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.left(), self.right()),
            p.y.clamp(self.top(), self.bottom()),
        )
    }
}

/// Inclusive overlap test: touching edges count as a hit
pub fn rect_rect_overlap(a: &Rect, b: &Rect) -> bool {
    a.left() <= b.right() && b.left() <= a.right() && a.top() <= b.bottom() && b.top() <= a.bottom()
}

/// Clamp the circle center onto the rectangle and compare squared distances
pub fn rect_circle_overlap(rect: &Rect, center: Vec2, radius: f32) -> bool {
    let nearest = rect.clamp_point(center);
    center.distance_squared(nearest) <= radius * radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_rect_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect_rect_overlap(&a, &Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!rect_rect_overlap(&a, &Rect::new(11.0, 0.0, 5.0, 5.0)));
        assert!(!rect_rect_overlap(&a, &Rect::new(0.0, 20.0, 5.0, 5.0)));
    }

    #[test]
    fn test_rect_rect_touching_edges_is_inclusive() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect_rect_overlap(&a, &Rect::new(10.0, 0.0, 5.0, 5.0)));
        assert!(rect_rect_overlap(&a, &Rect::new(0.0, 10.0, 5.0, 5.0)));
    }

    #[test]
    fn test_rect_circle_side_and_corner() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        // Side contact
        assert!(rect_circle_overlap(&rect, Vec2::new(14.0, 5.0), 4.0));
        assert!(!rect_circle_overlap(&rect, Vec2::new(14.5, 5.0), 4.0));
        // Corner: distance to (10,10) is 5 at (13,14)
        assert!(rect_circle_overlap(&rect, Vec2::new(13.0, 14.0), 5.0));
        assert!(!rect_circle_overlap(&rect, Vec2::new(13.0, 14.0), 4.9));
    }

    #[test]
    fn test_rect_circle_center_inside() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect_circle_overlap(&rect, Vec2::new(5.0, 5.0), 0.5));
    }

    #[test]
    fn test_bounding_square() {
        let r = Rect::around(Vec2::new(120.0, 320.0), 14.0);
        assert_eq!(r.left(), 106.0);
        assert_eq!(r.right(), 134.0);
        assert_eq!(r.top(), 306.0);
        assert_eq!(r.bottom(), 334.0);
    }
}
