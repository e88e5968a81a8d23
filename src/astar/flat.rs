// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::{planar_distance, Edge, Graph, SearchError};

/// Shortest path between two [Nodes](crate::Node), as found by [find_route].
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Ids of visited nodes, starting with the start node and ending with the end node.
    pub nodes: Vec<i64>,

    /// Sum of costs of all traversed [Edges](Edge).
    pub cost: f64,
}

#[derive(Debug, Clone, Copy)]
struct QueueItem {
    at: i64,
    cost: f64,
    score: f64,
    seq: u64,
}

impl PartialEq for QueueItem {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueItem {}

impl PartialOrd for QueueItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueItem {
    fn cmp(&self, other: &Self) -> Ordering {
        // NOTE: We revert the order of comparison,
        // as lower scores are considered better ("higher"),
        // and Rust's BinaryHeap is a max-heap.
        // Equal scores are popped in the order they were pushed.
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

fn reconstruct_path(came_from: &HashMap<i64, i64>, mut last: i64) -> Vec<i64> {
    let mut path = vec![last];

    while let Some(&nd) = came_from.get(&last) {
        path.push(nd);
        last = nd;
    }

    path.reverse();
    return path;
}

/// Uses the [A* algorithm](https://en.wikipedia.org/wiki/A*_search_algorithm)
/// to find the shortest route between two nodes in the provided graph.
///
/// Edges are strictly directed. The heuristic is the straight-line distance
/// to the end node, so the result is optimal as long as no edge is cheaper than
/// the straight-line distance between its endpoints (see [Graph::understated_edges]).
///
/// Returns [SearchError::InvalidReference] if either node doesn't exist,
/// and [SearchError::NoPath] if the end node is unreachable. If `from_id == to_id`,
/// the route consists of that single node and costs nothing.
pub fn find_route(g: &Graph, from_id: i64, to_id: i64) -> Result<Route, SearchError> {
    let to_node = *g
        .get_node(to_id)
        .ok_or(SearchError::InvalidReference(to_id))?;
    let from_node = g
        .get_node(from_id)
        .ok_or(SearchError::InvalidReference(from_id))?;

    let mut queue: BinaryHeap<QueueItem> = BinaryHeap::default();
    let mut came_from: HashMap<i64, i64> = HashMap::default();
    let mut known_costs: HashMap<i64, f64> = HashMap::default();
    let mut closed: HashSet<i64> = HashSet::default();
    let mut seq: u64 = 0;

    queue.push(QueueItem {
        at: from_id,
        cost: 0.0,
        score: planar_distance(from_node.position, to_node.position),
        seq,
    });
    known_costs.insert(from_id, 0.0);

    while let Some(item) = queue.pop() {
        // Multiple items for the same node might be kept in the queue;
        // only the first one popped is expanded.
        if !closed.insert(item.at) {
            continue;
        }

        if item.at == to_id {
            log::debug!(
                "found route {} -> {} with cost {} after expanding {} nodes",
                from_id,
                to_id,
                item.cost,
                closed.len(),
            );
            return Ok(Route {
                nodes: reconstruct_path(&came_from, to_id),
                cost: item.cost,
            });
        }

        for &Edge {
            to: neighbor_id,
            cost: edge_cost,
        } in g.get_edges(item.at)
        {
            if closed.contains(&neighbor_id) {
                continue;
            }

            // Graph::load guarantees that the neighbor exists
            let Some(neighbor) = g.get_node(neighbor_id) else {
                continue;
            };

            // Check if this is the cheapest way to the neighbor
            let neighbor_cost = item.cost + edge_cost;
            let best_cost = known_costs
                .get(&neighbor_id)
                .copied()
                .unwrap_or(f64::INFINITY);
            if neighbor_cost >= best_cost {
                continue;
            }

            // Push the new item into the queue
            seq += 1;
            came_from.insert(neighbor_id, item.at);
            known_costs.insert(neighbor_id, neighbor_cost);
            queue.push(QueueItem {
                at: neighbor_id,
                cost: neighbor_cost,
                score: neighbor_cost + planar_distance(neighbor.position, to_node.position),
                seq,
            });
        }
    }

    log::debug!(
        "no route {} -> {} after expanding {} nodes",
        from_id,
        to_id,
        closed.len(),
    );
    Err(SearchError::NoPath {
        from: from_id,
        to: to_id,
    })
}

#[cfg(test)]
mod tests {
    use nanorand::{Rng, WyRand};

    use super::*;
    use crate::testing::{assert_almost_eq, l_graph, record};
    use crate::NodeRecord;

    #[test]
    fn simple() {
        let g = l_graph();
        let r = find_route(&g, 1, 3).unwrap();
        assert_eq!(r.nodes, vec![1, 2, 3]);
        assert_almost_eq!(r.cost, 20.0);
    }

    #[test]
    fn same_start_and_end() {
        let g = l_graph();
        let r = find_route(&g, 2, 2).unwrap();
        assert_eq!(r.nodes, vec![2]);
        assert_eq!(r.cost, 0.0);
    }

    #[test]
    fn invalid_reference() {
        let g = l_graph();
        assert_eq!(find_route(&g, 1, 9), Err(SearchError::InvalidReference(9)));
        assert_eq!(find_route(&g, 9, 1), Err(SearchError::InvalidReference(9)));
        assert_eq!(find_route(&g, 9, 9), Err(SearchError::InvalidReference(9)));
    }

    #[test]
    fn directed_edges() {
        let g = l_graph();
        assert!(find_route(&g, 1, 2).is_ok());
        assert_eq!(find_route(&g, 2, 1), Err(SearchError::NoPath { from: 2, to: 1 }));
        assert_eq!(find_route(&g, 3, 1), Err(SearchError::NoPath { from: 3, to: 1 }));
    }

    #[test]
    fn disconnected_components() {
        //  1 ── 2       3 ── 4
        let g = Graph::load(vec![
            record(1, 0.0, 0.0, &[(2, None)]),
            record(2, 1.0, 0.0, &[(1, None)]),
            record(3, 5.0, 0.0, &[(4, None)]),
            record(4, 6.0, 0.0, &[(3, None)]),
        ])
        .unwrap();

        for (a, b) in [(1, 3), (1, 4), (2, 3), (2, 4), (3, 1), (4, 2)] {
            assert_eq!(find_route(&g, a, b), Err(SearchError::NoPath { from: a, to: b }));
        }
        assert_eq!(find_route(&g, 4, 3).unwrap().nodes, vec![4, 3]);
    }

    #[test]
    fn prefers_cheaper_detour() {
        //  1 ─(50)─ 2
        //  │        │
        //  3 ────── 4
        let g = Graph::load(vec![
            record(1, 0.0, 0.0, &[(2, Some(50.0)), (3, None)]),
            record(2, 10.0, 0.0, &[]),
            record(3, 0.0, 10.0, &[(4, None)]),
            record(4, 10.0, 10.0, &[(2, None)]),
        ])
        .unwrap();

        let r = find_route(&g, 1, 2).unwrap();
        assert_eq!(r.nodes, vec![1, 3, 4, 2]);
        assert_almost_eq!(r.cost, 30.0);
    }

    #[test]
    fn deterministic_tie_breaking() {
        // Two equally long ways from 1 to 4: via 2 and via 3.
        //     2
        //   /   \
        //  1     4
        //   \   /
        //     3
        let g = Graph::load(vec![
            record(1, 0.0, 0.0, &[(2, None), (3, None)]),
            record(2, 5.0, 5.0, &[(4, None)]),
            record(3, 5.0, -5.0, &[(4, None)]),
            record(4, 10.0, 0.0, &[]),
        ])
        .unwrap();

        let first = find_route(&g, 1, 4).unwrap();
        assert_eq!(first.nodes, vec![1, 2, 4]);
        for _ in 0..10 {
            assert_eq!(find_route(&g, 1, 4).unwrap(), first);
        }
    }

    /// Reference single-pair shortest path cost, without any heuristic.
    fn dijkstra(g: &Graph, from_id: i64, to_id: i64) -> Option<f64> {
        let mut dist: HashMap<i64, f64> = g.iter().map(|n| (n.id, f64::INFINITY)).collect();
        let mut done: HashSet<i64> = HashSet::default();
        dist.insert(from_id, 0.0);

        loop {
            let (at, at_dist) = dist
                .iter()
                .filter(|(id, d)| !done.contains(*id) && d.is_finite())
                .map(|(&id, &d)| (id, d))
                .min_by(|a, b| a.1.total_cmp(&b.1))?;

            if at == to_id {
                return Some(at_dist);
            }
            done.insert(at);

            for edge in g.get_edges(at) {
                let d = dist.get_mut(&edge.to).unwrap();
                if at_dist + edge.cost < *d {
                    *d = at_dist + edge.cost;
                }
            }
        }
    }

    fn random_graph(rng: &mut WyRand, nodes: i64, edges_per_node: u32) -> Graph {
        let positions = (0..nodes)
            .map(|_| {
                (
                    rng.generate_range(0_u32..100) as f64,
                    rng.generate_range(0_u32..100) as f64,
                )
            })
            .collect::<Vec<_>>();

        let records = positions
            .iter()
            .enumerate()
            .map(|(id, &(x, y))| NodeRecord {
                id: id as i64,
                position: (x, y).into(),
                neighbors: Vec::default(),
            })
            .map(|mut r| {
                for _ in 0..rng.generate_range(0..=edges_per_node) {
                    let to = rng.generate_range(0..nodes as u64) as i64;
                    let (tx, ty) = positions[to as usize];
                    // Either implicit, or stretched by up to 50%
                    let distance = match rng.generate_range(0_u32..3) {
                        0 => None,
                        _ => {
                            let straight = (r.position.x - tx).hypot(r.position.y - ty);
                            Some(straight * (1.0 + rng.generate_range(0_u32..50) as f64 / 100.0))
                        }
                    };
                    r.neighbors.push(crate::NeighborRecord { id: to, distance });
                }
                r
            })
            .collect::<Vec<_>>();

        Graph::load(records).unwrap()
    }

    #[test]
    fn optimal_against_dijkstra() {
        let mut rng = WyRand::new_seed(42);

        for _ in 0..25 {
            let g = random_graph(&mut rng, 40, 3);
            assert!(g.understated_edges().is_empty());

            for _ in 0..20 {
                let from = rng.generate_range(0_u64..40) as i64;
                let to = rng.generate_range(0_u64..40) as i64;

                match (find_route(&g, from, to), dijkstra(&g, from, to)) {
                    (Ok(r), Some(expected)) => {
                        assert_almost_eq!(r.cost, expected);
                        assert_eq!(r.nodes.first(), Some(&from));
                        assert_eq!(r.nodes.last(), Some(&to));

                        // Random graphs may contain parallel edges, take the cheapest one
                        let walked: f64 = r
                            .nodes
                            .windows(2)
                            .map(|w| {
                                g.get_edges(w[0])
                                    .iter()
                                    .filter(|e| e.to == w[1])
                                    .map(|e| e.cost)
                                    .fold(f64::INFINITY, f64::min)
                            })
                            .sum();
                        assert_almost_eq!(walked, r.cost);
                    }
                    (Err(SearchError::NoPath { .. }), None) => {}
                    (actual, expected) => {
                        panic!("{} -> {}: A* gave {:?}, Dijkstra gave {:?}", from, to, actual, expected)
                    }
                }
            }
        }
    }
}
