// SPDX-License-Identifier: MIT OR Apache-2.0
//! Geometry primitives and the screen/graph coordinate transform.
//!
//! Node positions, edge waypoints and connector endpoints are all stored in
//! *graph space*, the pan/zoom-independent coordinate system. Pointer events
//! and measured element rectangles arrive in *screen space*. The two meet
//! only at [`Viewport::to_graph_space`] / [`Viewport::to_screen_space`],
//! which is what lets the pan/zoom engine be swapped without touching the
//! document model.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// A 2D point, in graph or screen space depending on context.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point {
    /// Origin point.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Round both coordinates to the nearest multiple of `step`.
    pub fn snapped(self, step: f64) -> Self {
        Self {
            x: (self.x / step).round() * step,
            y: (self.y / step).round() * step,
        }
    }
}

impl Add for Point {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Point {
    type Output = Self;
    fn div(self, rhs: f64) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

/// A measured width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    /// Width in the owning space's units
    pub width: f64,
    /// Height in the owning space's units
    pub height: f64,
}

impl Size {
    /// Create a new size.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub min: Point,
    /// Bottom-right corner
    pub max: Point,
}

impl Rect {
    /// Build a rectangle from two arbitrary corner points, normalizing so
    /// that `min` is the top-left and `max` the bottom-right.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Build a rectangle from its top-left corner and size.
    pub fn from_min_size(min: Point, size: Size) -> Self {
        Self {
            min,
            max: Point::new(min.x + size.width, min.y + size.height),
        }
    }

    /// Rectangle width.
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Rectangle height.
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Whether `p` lies inside this rectangle (inclusive bounds).
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Whether `other` lies *entirely* inside this rectangle, all four
    /// corners strictly within bounds. Partial overlap does not count; this
    /// is the box-selection containment rule.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.min.x > self.min.x
            && other.min.y > self.min.y
            && other.max.x < self.max.x
            && other.max.y < self.max.y
    }
}

/// The affine transform supplied by the external viewport collaborator:
/// scale first, then translate by `position`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Pan offset in screen pixels
    pub position: Point,
    /// Zoom factor
    pub scale: f64,
}

impl Viewport {
    /// Create a new viewport transform.
    pub fn new(position: Point, scale: f64) -> Self {
        Self { position, scale }
    }

    /// Convert a screen-space point to graph space. `origin` is the
    /// top-left of the canvas element in screen coordinates.
    pub fn to_graph_space(&self, screen: Point, origin: Point) -> Point {
        (screen - origin - self.position) / self.scale
    }

    /// Convert a graph-space point to screen space. Exact inverse of
    /// [`Self::to_graph_space`].
    pub fn to_screen_space(&self, graph: Point, origin: Point) -> Point {
        graph * self.scale + self.position + origin
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            position: Point::ZERO,
            scale: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_round_trip() {
        let vp = Viewport::new(Point::new(120.0, -35.0), 1.75);
        let origin = Point::new(8.0, 64.0);
        let screen = Point::new(412.0, 230.5);

        let graph = vp.to_graph_space(screen, origin);
        let back = vp.to_screen_space(graph, origin);

        assert!((back.x - screen.x).abs() < 1e-9);
        assert!((back.y - screen.y).abs() < 1e-9);
    }

    #[test]
    fn test_identity_viewport() {
        let vp = Viewport::default();
        let p = Point::new(42.0, -7.0);
        assert_eq!(vp.to_graph_space(p, Point::ZERO), p);
        assert_eq!(vp.to_screen_space(p, Point::ZERO), p);
    }

    #[test]
    fn test_scale_divides_screen_delta() {
        let vp = Viewport::new(Point::ZERO, 2.0);
        let g = vp.to_graph_space(Point::new(100.0, 50.0), Point::ZERO);
        assert_eq!(g, Point::new(50.0, 25.0));
    }

    #[test]
    fn test_snapped_lands_on_grid() {
        let p = Point::new(37.3, -12.9).snapped(10.0);
        assert_eq!(p, Point::new(40.0, -10.0));
    }

    #[test]
    fn test_contains_rect_is_strict() {
        let outer = Rect::from_corners(Point::new(0.0, 0.0), Point::new(100.0, 100.0));
        let inside = Rect::from_corners(Point::new(10.0, 10.0), Point::new(90.0, 90.0));
        let touching = Rect::from_corners(Point::new(0.0, 10.0), Point::new(90.0, 90.0));
        let overlapping = Rect::from_corners(Point::new(50.0, 50.0), Point::new(150.0, 90.0));

        assert!(outer.contains_rect(&inside));
        assert!(!outer.contains_rect(&touching));
        assert!(!outer.contains_rect(&overlapping));
    }

    #[test]
    fn test_from_corners_normalizes() {
        let r = Rect::from_corners(Point::new(50.0, 60.0), Point::new(10.0, 20.0));
        assert_eq!(r.min, Point::new(10.0, 20.0));
        assert_eq!(r.max, Point::new(50.0, 60.0));
    }
}
