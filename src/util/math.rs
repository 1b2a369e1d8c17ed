//! Math type re-exports and stroke-specific math utilities.
//!
//! Points decoded from an archive are plain `glam` vectors; this module
//! adds the 2D bounding box used to fit strokes into a viewport.

// Re-export glam types
pub use glam::{Vec2, Vec3, Vec4, DVec2, IVec2, UVec2};

use std::fmt;

/// 2D bounding box with single precision.
#[derive(Clone, Copy, PartialEq)]
pub struct BBox2f {
    pub min: Vec2,
    pub max: Vec2,
}

impl BBox2f {
    /// Empty bounding box (inverted, will expand on first point).
    pub const EMPTY: Self = Self {
        min: Vec2::splat(f32::INFINITY),
        max: Vec2::splat(f32::NEG_INFINITY),
    };

    /// Create a new bounding box from min and max points.
    #[inline]
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Create a bounding box from a single point.
    #[inline]
    pub fn from_point(p: Vec2) -> Self {
        Self { min: p, max: p }
    }

    /// Check if this box is empty (has no area).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Expand this box to include a point.
    #[inline]
    pub fn expand_by_point(&mut self, p: Vec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Expand this box to include another box.
    #[inline]
    pub fn expand_by_box(&mut self, other: &Self) {
        if !other.is_empty() {
            self.min = self.min.min(other.min);
            self.max = self.max.max(other.max);
        }
    }

    /// Get the center of the box.
    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Get the size (extents) of the box.
    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }
}

impl Default for BBox2f {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Debug for BBox2f {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "BBox2f(empty)")
        } else {
            write!(
                f,
                "BBox2f(({}, {}) - ({}, {}))",
                self.min.x, self.min.y, self.max.x, self.max.y
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_box() {
        let b = BBox2f::EMPTY;
        assert!(b.is_empty());
        assert!(BBox2f::default().is_empty());
    }

    #[test]
    fn test_expand() {
        let mut b = BBox2f::EMPTY;
        b.expand_by_point(Vec2::new(1.0, 2.0));
        assert!(!b.is_empty());
        assert_eq!(b.min, Vec2::new(1.0, 2.0));
        assert_eq!(b.max, Vec2::new(1.0, 2.0));

        b.expand_by_point(Vec2::new(-1.0, 5.0));
        assert_eq!(b.min, Vec2::new(-1.0, 2.0));
        assert_eq!(b.max, Vec2::new(1.0, 5.0));
        assert_eq!(b.center(), Vec2::new(0.0, 3.5));
        assert_eq!(b.size(), Vec2::new(2.0, 3.0));
    }
}
