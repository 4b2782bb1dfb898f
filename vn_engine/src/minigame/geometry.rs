//! Canvas geometry shared by the simulation variants.

use serde::{Deserialize, Serialize};

pub const CANVAS_WIDTH: f32 = 800.0;
pub const CANVAS_HEIGHT: f32 = 600.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Vec2) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

/// A circular body. All collisions in the minigames are circle tests.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub const fn new(x: f32, y: f32, radius: f32) -> Self {
        Self {
            center: Vec2::new(x, y),
            radius,
        }
    }

    /// Strict overlap: center distance below the sum of radii.
    pub fn overlaps(&self, other: &Circle) -> bool {
        self.center.distance(other.center) < self.radius + other.radius
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.center.distance(point) < self.radius
    }

    /// Whether the center lies more than `margin` outside the canvas.
    pub fn beyond_canvas(&self, margin: f32) -> bool {
        self.center.x < -margin
            || self.center.x > CANVAS_WIDTH + margin
            || self.center.y < -margin
            || self.center.y > CANVAS_HEIGHT + margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_is_strict() {
        let a = Circle::new(0.0, 0.0, 10.0);
        assert!(a.overlaps(&Circle::new(19.0, 0.0, 10.0)));
        assert!(!a.overlaps(&Circle::new(20.0, 0.0, 10.0)));
    }

    #[test]
    fn test_contains() {
        let target = Circle::new(100.0, 100.0, 30.0);
        assert!(target.contains(Vec2::new(110.0, 120.0)));
        assert!(!target.contains(Vec2::new(130.0, 100.0)));
    }

    #[test]
    fn test_beyond_canvas() {
        assert!(!Circle::new(-40.0, 300.0, 15.0).beyond_canvas(50.0));
        assert!(Circle::new(-51.0, 300.0, 15.0).beyond_canvas(50.0));
        assert!(Circle::new(400.0, 651.0, 15.0).beyond_canvas(50.0));
    }
}
