// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Pedestrian route finding over a static graph of waypoints.
//!
//! A [Graph] of waypoint [Nodes](Node) is loaded once, either from in-memory
//! [NodeRecords](NodeRecord) or from a JSON dataset. Arbitrary map positions are
//! snapped onto the nearest node, and A* finds the shortest walkable path between
//! the snapped nodes. The result is a [PathResult]: a line of positions plus
//! the total walking distance.
//!
//! # Example
//!
//! ```no_run
//! let g = waypath::load_from_json_file("path/to/nodes.json", &Default::default())
//!     .expect("failed to load nodes.json");
//!
//! let result = waypath::route(
//!     &g,
//!     waypath::Point::new(1050.0, 2942.0),
//!     waypath::Point::new(1480.0, 2210.0),
//! )
//! .expect("failed to find route");
//!
//! println!("{:.2}: {:?}", result.distance, result.positions);
//! ```

mod astar;
mod distance;
mod graph;
mod json;
mod kd;
mod locator;
mod route;

pub use astar::{find_route, Route, SearchError};
pub use distance::planar_distance;
pub use graph::{Graph, GraphError, LoadOptions};
pub use json::{load_from_json_file, load_from_json_reader, load_from_json_slice, LoadError};
pub use kd::KDTree;
pub use locator::{nearest, Locator};
pub use route::{route, route_to_node, route_with, RouteError};

use serde::{Deserialize, Serialize};

/// A position on the map plane.
///
/// Node positions and query points must share one coordinate system
/// (map pixels in the bundled datasets). Serialized as a `[x, y]` array.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Represents a waypoint of the [Graph].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub id: i64,
    pub position: Point,
}

/// Represents an outgoing (one-way) connection from a specific [Node].
///
/// `cost` is never negative. Edges built without an explicit distance
/// cost exactly the straight-line distance between their endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub to: i64,
    pub cost: f64,
}

/// Source description of a single waypoint, as stored in waypoint datasets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: i64,
    pub position: Point,
    #[serde(default)]
    pub neighbors: Vec<NeighborRecord>,
}

/// Source description of an outgoing connection of a [NodeRecord].
///
/// If `distance` is absent, the straight-line distance between
/// both waypoints is used.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NeighborRecord {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

/// A walkable route between two map positions.
///
/// `positions` starts with the origin, goes through every visited waypoint
/// and (for point-to-point routes) ends with the destination, so it always
/// has at least 2 elements. `distance` is the sum of the snap segments and
/// the graph path cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathResult {
    pub positions: Vec<Point>,
    pub distance: f64,
}
