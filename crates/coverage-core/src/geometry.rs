//! Geometry Utilities
//!
//! Plane coordinates, Euclidean distance, and the grid bounds check.

use serde::{Deserialize, Serialize};

/// A 2D position on the operating grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Euclidean distance between two points
pub fn distance(a: Point, b: Point) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// Whether a point lies inside the half-open operating square
/// `[0, grid_size) x [0, grid_size)`
pub fn in_bounds(p: Point, grid_size: f64) -> bool {
    p.x >= 0.0 && p.x < grid_size && p.y >= 0.0 && p.y < grid_size
}
