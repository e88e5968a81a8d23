// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{find_route, Graph, Locator, Node, PathResult, Point, SearchError};

/// Reasons why no [PathResult] could be produced between two map positions.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum RouteError {
    /// The graph has no nodes, so routing is unavailable.
    #[error("graph has no nodes")]
    NoNodes,

    /// A query position has a NaN or infinite coordinate.
    #[error("invalid position ({x}, {y})")]
    InvalidPoint { x: f64, y: f64 },

    /// The snapped nodes are not connected.
    #[error(transparent)]
    NoPath(#[from] SearchError),
}

/// Finds the shortest walkable route between two arbitrary map positions.
///
/// Both positions are snapped onto their nearest [Nodes](crate::Node)
/// and A* is run between them. The returned distance is the sum of both
/// snap segments and the graph path cost.
pub fn route(g: &Graph, origin: Point, destination: Point) -> Result<PathResult, RouteError> {
    route_with(g, g, origin, destination)
}

/// Like [route], but snaps positions with a custom [Locator],
/// e.g. a [KDTree](crate::KDTree) built over `g`.
///
/// Nodes returned by the locator must belong to `g`; otherwise
/// [SearchError::InvalidReference] is returned.
pub fn route_with<L: Locator + ?Sized>(
    g: &Graph,
    locator: &L,
    origin: Point,
    destination: Point,
) -> Result<PathResult, RouteError> {
    let (start, snap_in) = snap(g, locator, origin)?;
    let (end, snap_out) = snap(g, locator, destination)?;

    log::trace!(
        "snapped ({}, {}) -> {} and ({}, {}) -> {}",
        origin.x,
        origin.y,
        start.id,
        destination.x,
        destination.y,
        end.id,
    );

    // Both positions share the nearest node - walk straight through it
    if start.id == end.id {
        return Ok(PathResult {
            positions: vec![origin, destination],
            distance: snap_in + snap_out,
        });
    }

    let r = find_route(g, start.id, end.id)?;
    let mut positions = Vec::with_capacity(r.nodes.len() + 2);
    positions.push(origin);
    positions.extend(node_positions(g, &r.nodes));
    positions.push(destination);

    Ok(PathResult {
        positions,
        distance: snap_in + r.cost + snap_out,
    })
}

/// Finds the shortest walkable route from an arbitrary map position
/// to a known waypoint.
///
/// The returned positions start with `origin` and end with the position of
/// the `goal_id` node; the distance is the snap segment plus the graph path cost.
pub fn route_to_node(g: &Graph, origin: Point, goal_id: i64) -> Result<PathResult, RouteError> {
    let (start, snap_in) = snap(g, g, origin)?;
    let r = find_route(g, start.id, goal_id)?;

    let mut positions = Vec::with_capacity(r.nodes.len() + 1);
    positions.push(origin);
    positions.extend(node_positions(g, &r.nodes));

    Ok(PathResult {
        positions,
        distance: snap_in + r.cost,
    })
}

fn snap<L: Locator + ?Sized>(
    g: &Graph,
    locator: &L,
    point: Point,
) -> Result<(Node, f64), RouteError> {
    if !point.is_finite() {
        return Err(RouteError::InvalidPoint {
            x: point.x,
            y: point.y,
        });
    }

    let (nd, dist) = locator.nearest_node(point).ok_or(RouteError::NoNodes)?;
    if g.get_node(nd.id).is_none() {
        return Err(SearchError::InvalidReference(nd.id).into());
    }
    Ok((nd, dist))
}

fn node_positions<'a>(g: &'a Graph, nodes: &'a [i64]) -> impl Iterator<Item = Point> + 'a {
    nodes
        .iter()
        .filter_map(move |&id| g.get_node(id).map(|n| n.position))
}
