//! Planar Geometry Primitives
//!
//! Vertices, triangles and the fixed equilateral base triangle shared by
//! both generators.
//!
//! License: MIT

use std::ops::{Add, Mul, Sub};

use crate::error::{GasketError, Result};

/// Twice-area below which three vertices are treated as collinear
const DEGENERATE_AREA_THRESHOLD: f64 = 1e-12;

/// Height of the unit equilateral triangle (√3 / 2)
pub const BASE_HEIGHT: f64 = 0.866_025_403_784_438_6;

// ============================================================================
// Vertex
// ============================================================================

/// A point in the plane
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
}

impl Vertex {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point halfway between `self` and `other`
    #[inline]
    pub fn midpoint(self, other: Vertex) -> Vertex {
        (self + other) * 0.5
    }

    /// Euclidean distance to `other`
    #[inline]
    pub fn distance(self, other: Vertex) -> f64 {
        (self - other).norm()
    }

    #[inline]
    pub fn norm(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// 2D cross product (z component of the 3D cross product)
    #[inline]
    fn cross(self, other: Vertex) -> f64 {
        self.x * other.y - self.y * other.x
    }
}

impl Add for Vertex {
    type Output = Vertex;

    #[inline]
    fn add(self, rhs: Vertex) -> Vertex {
        Vertex::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vertex {
    type Output = Vertex;

    #[inline]
    fn sub(self, rhs: Vertex) -> Vertex {
        Vertex::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vertex {
    type Output = Vertex;

    #[inline]
    fn mul(self, rhs: f64) -> Vertex {
        Vertex::new(self.x * rhs, self.y * rhs)
    }
}

impl From<(f64, f64)> for Vertex {
    fn from((x, y): (f64, f64)) -> Self {
        Vertex::new(x, y)
    }
}

// ============================================================================
// Triangle
// ============================================================================

/// An ordered vertex triple with positive area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    vertices: [Vertex; 3],
}

impl Triangle {
    /// Build a triangle, rejecting collinear vertices.
    pub fn new(a: Vertex, b: Vertex, c: Vertex) -> Result<Self> {
        let twice_area = (b - a).cross(c - a).abs();
        if twice_area < DEGENERATE_AREA_THRESHOLD {
            return Err(GasketError::InvalidInput(format!(
                "collinear vertices ({}, {}), ({}, {}), ({}, {})",
                a.x, a.y, b.x, b.y, c.x, c.y
            )));
        }
        Ok(Self { vertices: [a, b, c] })
    }

    /// Build a triangle from vertices already known to be non-degenerate
    /// (cells of a subdivided triangle).
    #[inline]
    pub(crate) const fn from_vertices_unchecked(vertices: [Vertex; 3]) -> Self {
        Self { vertices }
    }

    /// The equilateral base triangle A=(0.5, √3/2), B=(0, 0), C=(1, 0)
    pub const fn base() -> Self {
        Self::from_vertices_unchecked(BASE_VERTICES)
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex; 3] {
        &self.vertices
    }

    #[inline]
    pub fn centroid(&self) -> Vertex {
        let [a, b, c] = self.vertices;
        (a + b + c) * (1.0 / 3.0)
    }

    /// Unsigned area (shoelace formula)
    #[inline]
    pub fn area(&self) -> f64 {
        let [a, b, c] = self.vertices;
        (b - a).cross(c - a).abs() * 0.5
    }

    /// Inclusive point-in-triangle test with an absolute tolerance.
    ///
    /// Points on an edge count as inside.
    pub fn contains(&self, p: Vertex, tolerance: f64) -> bool {
        let [a, b, c] = self.vertices;
        let d1 = (b - a).cross(p - a);
        let d2 = (c - b).cross(p - b);
        let d3 = (a - c).cross(p - c);

        let has_neg = d1 < -tolerance || d2 < -tolerance || d3 < -tolerance;
        let has_pos = d1 > tolerance || d2 > tolerance || d3 > tolerance;
        !(has_neg && has_pos)
    }

    /// Axis-aligned bounds as `(min, max)`
    pub fn bounds(&self) -> (Vertex, Vertex) {
        let [a, b, c] = self.vertices;
        (
            Vertex::new(a.x.min(b.x).min(c.x), a.y.min(b.y).min(c.y)),
            Vertex::new(a.x.max(b.x).max(c.x), a.y.max(b.y).max(c.y)),
        )
    }
}

/// Vertices of the base triangle in the order A, B, C
pub const BASE_VERTICES: [Vertex; 3] = [
    Vertex::new(0.5, BASE_HEIGHT),
    Vertex::new(0.0, 0.0),
    Vertex::new(1.0, 0.0),
];

/// Sum of triangle areas
pub fn total_area(triangles: &[Triangle]) -> f64 {
    triangles.iter().map(Triangle::area).sum()
}
