// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::cmp::Ordering;

use crate::{planar_distance, Graph, Node, Point};

/// A [Node] together with its position in the [Graph] load order,
/// used to resolve equidistant candidates the same way a linear scan would.
#[derive(Debug, Clone, Copy)]
struct Ranked {
    rank: usize,
    node: Node,
}

/// KDTree implements the [k-d tree data structure](https://en.wikipedia.org/wiki/K-d_tree),
/// which can be used to speed up nearest-neighbor search for large waypoint graphs.
/// [Graph::nearest_node](crate::Locator::nearest_node) scans every node, which is fine
/// for campus-sized graphs but becomes the dominating cost once graphs get large.
///
/// The tree answers exactly like the linear scan: among equidistant nodes,
/// the one loaded first into the [Graph] wins.
#[derive(Debug, Clone)]
pub struct KDTree {
    pivot: Ranked,
    left: Option<Box<KDTree>>,
    right: Option<Box<KDTree>>,
}

impl KDTree {
    /// Finds the closest [Node] to the given position, together with the distance to it.
    pub fn find_nearest_node(&self, point: Point) -> (Node, f64) {
        let (best, dist) = self.find_nearest_node_impl(point, false);
        (best.node, dist)
    }

    fn find_nearest_node_impl(&self, point: Point, y_divides: bool) -> (Ranked, f64) {
        // Start by assuming that pivot is the closest
        let mut best = self.pivot;
        let mut best_dist = planar_distance(point, best.node.position);

        // Select which branch to recurse into first
        let (coord, pivot_coord) = split_coords(point, self.pivot.node.position, y_divides);
        let (first, second) = if coord < pivot_coord {
            (&self.left, &self.right)
        } else {
            (&self.right, &self.left)
        };

        // Recurse into the first branch
        if let Some(ref branch) = first {
            let (alt, alt_dist) = branch.find_nearest_node_impl(point, !y_divides);
            if is_better(alt, alt_dist, best, best_dist) {
                best = alt;
                best_dist = alt_dist;
            }
        }

        // (Optionally) recurse into the second branch
        if let Some(ref branch) = second {
            // A closer (or equally close, but earlier loaded) node is possible
            // in the second branch only if the splitting axis is not further
            // than the current best candidate.
            let dist_to_axis = (coord - pivot_coord).abs();

            if dist_to_axis <= best_dist {
                let (alt, alt_dist) = branch.find_nearest_node_impl(point, !y_divides);
                if is_better(alt, alt_dist, best, best_dist) {
                    best = alt;
                    best_dist = alt_dist;
                }
            }
        }

        (best, best_dist)
    }

    /// Builds a k-d tree over all nodes of a [Graph].
    /// Returns `None` if the graph is empty.
    pub fn from_graph(g: &Graph) -> Option<Self> {
        Self::from_iter(g.iter().copied())
    }

    /// Builds a k-d tree from an iterable of [Nodes](Node). Iteration order is used
    /// to break ties between equidistant nodes (earlier wins).
    pub fn from_iter<I: IntoIterator<Item = Node>>(nodes: I) -> Option<Self> {
        let mut nodes = nodes
            .into_iter()
            .enumerate()
            .map(|(rank, node)| Ranked { rank, node })
            .collect::<Vec<_>>();
        Self::build_impl(nodes.as_mut_slice(), false)
    }

    fn build_impl(nodes: &mut [Ranked], y_divides: bool) -> Option<Self> {
        match nodes.len() {
            0 => None,
            1 => Some(Self {
                pivot: nodes[0],
                left: None,
                right: None,
            }),
            _ => {
                if y_divides {
                    nodes.sort_by(|a, b| total_cmp(a.node.position.y, b.node.position.y));
                } else {
                    nodes.sort_by(|a, b| total_cmp(a.node.position.x, b.node.position.x));
                }
                let median = nodes.len() / 2;
                let pivot = nodes[median];
                let (left, right_and_pivot) = nodes.split_at_mut(median);
                let right = &mut right_and_pivot[1..];
                Some(Self {
                    pivot,
                    left: box_option(Self::build_impl(left, !y_divides)),
                    right: box_option(Self::build_impl(right, !y_divides)),
                })
            }
        }
    }
}

#[inline]
fn split_coords(point: Point, pivot: Point, y_divides: bool) -> (f64, f64) {
    if y_divides {
        (point.y, pivot.y)
    } else {
        (point.x, pivot.x)
    }
}

#[inline]
fn is_better(candidate: Ranked, candidate_dist: f64, best: Ranked, best_dist: f64) -> bool {
    candidate_dist < best_dist || (candidate_dist == best_dist && candidate.rank < best.rank)
}

#[inline]
fn total_cmp(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

#[inline]
fn box_option<T>(o: Option<T>) -> Option<Box<T>> {
    o.map(|thing| Box::new(thing))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: i64, x: f64, y: f64) -> Node {
        Node {
            id,
            position: Point::new(x, y),
        }
    }

    #[test]
    fn kd_tree() {
        let tree = KDTree::from_iter([
            node(1, 1.0, 1.0),
            node(2, 5.0, 1.0),
            node(3, 9.0, 3.0),
            node(4, 3.0, 4.0),
            node(5, 7.0, 4.0),
            node(6, 3.0, 7.0),
            node(7, 1.0, 7.0),
            node(8, 5.0, 8.0),
            node(9, 9.0, 8.0),
        ])
        .expect("k-d tree from non-empty iterator must not be empty");

        assert_eq!(tree.find_nearest_node(Point::new(2.0, 2.0)).0.id, 1);
        assert_eq!(tree.find_nearest_node(Point::new(3.0, 5.0)).0.id, 4);
        assert_eq!(tree.find_nearest_node(Point::new(8.0, 5.0)).0.id, 5);
        assert_eq!(tree.find_nearest_node(Point::new(6.0, 9.0)).0.id, 8);

        let (nd, dist) = tree.find_nearest_node(Point::new(9.0, 0.0));
        assert_eq!(nd.id, 3);
        assert_eq!(dist, 3.0);
    }

    #[test]
    fn kd_tree_ties_prefer_first_loaded() {
        // Point (5, 5) is equidistant to all four corners
        let tree = KDTree::from_iter([
            node(40, 10.0, 10.0),
            node(10, 0.0, 0.0),
            node(30, 0.0, 10.0),
            node(20, 10.0, 0.0),
        ])
        .unwrap();
        assert_eq!(tree.find_nearest_node(Point::new(5.0, 5.0)).0.id, 40);

        // Identical positions
        let tree = KDTree::from_iter([node(7, 2.0, 2.0), node(3, 2.0, 2.0), node(5, 2.0, 2.0)]).unwrap();
        assert_eq!(tree.find_nearest_node(Point::new(0.0, 0.0)).0.id, 7);
    }

    #[test]
    fn kd_tree_empty() {
        assert!(KDTree::from_iter(std::iter::empty()).is_none());
    }
}
