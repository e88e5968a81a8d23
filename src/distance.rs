// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::Point;

/// Calculates the straight-line distance between two positions on the map plane.
///
/// This is the only metric used by the crate: the A* heuristic, snap distances
/// and implicit [Edge](crate::Edge) costs all come from here, which keeps the
/// heuristic consistent with edge costs.
pub fn planar_distance(a: Point, b: Point) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}
