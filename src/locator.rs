// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{planar_distance, Graph, KDTree, Node, Point, RouteError};

/// Snaps arbitrary map positions onto waypoint [Nodes](Node).
///
/// Implementations must return the node with the minimum straight-line
/// distance to `point`, preferring the node loaded first into the [Graph]
/// when several are equally close. `None` is returned only if there are no nodes.
///
/// `point` must have finite coordinates; [nearest] and the
/// [route](crate::route) functions check this before calling a locator.
pub trait Locator {
    fn nearest_node(&self, point: Point) -> Option<(Node, f64)>;
}

impl Locator for Graph {
    /// Computes the distance to every [Node] in the graph. Fine for graphs
    /// of a few hundred waypoints; use a [KDTree] for anything larger.
    fn nearest_node(&self, point: Point) -> Option<(Node, f64)> {
        self.iter()
            .map(|&nd| (nd, planar_distance(point, nd.position)))
            .reduce(|best, candidate| if candidate.1 < best.1 { candidate } else { best })
    }
}

impl Locator for KDTree {
    fn nearest_node(&self, point: Point) -> Option<(Node, f64)> {
        Some(self.find_nearest_node(point))
    }
}

/// Finds the [Node] closest to `point` and the distance to it.
pub fn nearest(g: &Graph, point: Point) -> Result<(Node, f64), RouteError> {
    if !point.is_finite() {
        return Err(RouteError::InvalidPoint {
            x: point.x,
            y: point.y,
        });
    }
    g.nearest_node(point).ok_or(RouteError::NoNodes)
}
