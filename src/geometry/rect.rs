//! Axis-aligned bounding rectangle

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Bounding rectangle a shape is fitted into (origin at top-left)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rect of the given size with its origin at (0, 0)
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.width, self.y + self.height)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Perimeter of the rectangle itself
    pub fn perimeter(&self) -> f32 {
        2.0 * (self.width + self.height)
    }

    /// Shrink by `dx` on the left/right and `dy` on the top/bottom
    pub fn inset(&self, dx: f32, dy: f32) -> Self {
        Self::new(
            self.x + dx,
            self.y + dy,
            self.width - 2.0 * dx,
            self.height - 2.0 * dy,
        )
    }

    /// Largest centered square that fits inside this rect
    ///
    /// Canvases fit shapes into this so the ellipse draws as a circle and
    /// the rectangle as a square.
    pub fn square_fit(&self) -> Self {
        let side = self.width.min(self.height);
        let c = self.center();
        Self::new(c.x - side * 0.5, c.y - side * 0.5, side, side)
    }
}
