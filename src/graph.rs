// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::hash_map::{Entry, HashMap};

use crate::{planar_distance, Edge, Node, NodeRecord, Point};

/// Reasons for refusing to build a [Graph] from waypoint records.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    #[error("node {from} has an edge to unknown node {to}")]
    UnknownNeighbor { from: i64, to: i64 },

    #[error("edge {from} -> {to} has invalid weight {weight}")]
    InvalidWeight { from: i64, to: i64, weight: f64 },

    #[error("duplicate node {0}")]
    DuplicateNode(i64),

    #[error("node {id} has invalid position ({x}, {y})")]
    InvalidPosition { id: i64, x: f64, y: f64 },

    #[error("edge {from} -> {to} has weight {weight}, shorter than the straight-line distance {straight}")]
    UnderstatedWeight {
        from: i64,
        to: i64,
        weight: f64,
        straight: f64,
    },
}

/// Additional controls for validating waypoint records in [Graph::load_with_options].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Refuse explicit edge weights shorter than the straight-line distance between
    /// their endpoints with [GraphError::UnderstatedWeight]. Such edges may make
    /// A* return a slightly suboptimal route; when this is `false` they are only
    /// logged and reported by [Graph::understated_edges].
    pub reject_understated: bool,
}

/// Represents a pedestrian network as a set of waypoint [Nodes](Node)
/// and directed [Edges](Edge) between them.
///
/// A graph is immutable once loaded and can be shared between threads
/// without any locking.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Graph {
    nodes: Vec<(Node, Vec<Edge>)>,
    index: HashMap<i64, usize>,
    understated: Vec<(i64, i64)>,
}

impl Graph {
    /// Builds a graph from waypoint records with the default [LoadOptions].
    pub fn load<I: IntoIterator<Item = NodeRecord>>(records: I) -> Result<Self, GraphError> {
        Self::load_with_options(records, &LoadOptions::default())
    }

    /// Builds a graph from waypoint records.
    ///
    /// Every neighbor must refer to a node present among the records,
    /// and every explicit distance must be a finite, non-negative number.
    /// Missing distances are replaced by the straight-line distance between the nodes.
    pub fn load_with_options<I: IntoIterator<Item = NodeRecord>>(
        records: I,
        options: &LoadOptions,
    ) -> Result<Self, GraphError> {
        let records = records.into_iter().collect::<Vec<_>>();
        let mut g = Self {
            nodes: Vec::with_capacity(records.len()),
            index: HashMap::with_capacity(records.len()),
            understated: Vec::default(),
        };

        // First pass: nodes, so that edges may refer to nodes defined later
        for r in &records {
            if !r.position.is_finite() {
                return Err(GraphError::InvalidPosition {
                    id: r.id,
                    x: r.position.x,
                    y: r.position.y,
                });
            }

            match g.index.entry(r.id) {
                Entry::Occupied(_) => return Err(GraphError::DuplicateNode(r.id)),
                Entry::Vacant(e) => {
                    e.insert(g.nodes.len());
                }
            }

            let node = Node {
                id: r.id,
                position: r.position,
            };
            g.nodes.push((node, Vec::with_capacity(r.neighbors.len())));
        }

        // Second pass: edges
        for (idx, r) in records.iter().enumerate() {
            let from = r.position;
            for neighbor in &r.neighbors {
                let to = g
                    .get_node(neighbor.id)
                    .ok_or(GraphError::UnknownNeighbor {
                        from: r.id,
                        to: neighbor.id,
                    })?
                    .position;
                let cost = g.edge_cost(r.id, from, neighbor.id, to, neighbor.distance, options)?;
                g.nodes[idx].1.push(Edge {
                    to: neighbor.id,
                    cost,
                });
            }
        }

        log::debug!(
            "loaded waypoint graph with {} nodes and {} edges",
            g.len(),
            g.edge_count(),
        );
        Ok(g)
    }

    fn edge_cost(
        &mut self,
        from_id: i64,
        from: Point,
        to_id: i64,
        to: Point,
        explicit: Option<f64>,
        options: &LoadOptions,
    ) -> Result<f64, GraphError> {
        let straight = planar_distance(from, to);
        let Some(weight) = explicit else {
            return Ok(straight);
        };

        if !weight.is_finite() || weight < 0.0 {
            return Err(GraphError::InvalidWeight {
                from: from_id,
                to: to_id,
                weight,
            });
        }

        if weight < straight {
            if options.reject_understated {
                return Err(GraphError::UnderstatedWeight {
                    from: from_id,
                    to: to_id,
                    weight,
                    straight,
                });
            }

            log::warn!(
                "edge {} -> {} has weight {} shorter than the straight-line distance {}",
                from_id,
                to_id,
                weight,
                straight,
            );
            self.understated.push((from_id, to_id));
        }

        Ok(weight)
    }

    /// Returns the number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|(_, edges)| edges.len()).sum()
    }

    /// Returns an iterator over all [Nodes](Node), in the order they were loaded.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().map(|(node, _)| node)
    }

    /// Retrieves a [Node] with the provided id.
    pub fn get_node(&self, id: i64) -> Option<&Node> {
        self.index.get(&id).map(|&idx| &self.nodes[idx].0)
    }

    /// Gets all outgoing [Edges](Edge) from a node with a given id.
    pub fn get_edges(&self, from_id: i64) -> &[Edge] {
        self.index
            .get(&from_id)
            .map(|&idx| self.nodes[idx].1.as_slice())
            .unwrap_or_default()
    }

    /// Gets the cost of an [Edge] from one node to another.
    /// If such an edge doesn't exist, returns [f64::INFINITY].
    pub fn get_edge(&self, from_id: i64, to_id: i64) -> f64 {
        self.get_edges(from_id)
            .iter()
            .find_map(|edge| if edge.to == to_id { Some(edge.cost) } else { None })
            .unwrap_or(f64::INFINITY)
    }

    /// Lists `(from, to)` pairs of edges whose explicit weight was shorter than
    /// the straight-line distance between their endpoints.
    pub fn understated_edges(&self) -> &[(i64, i64)] {
        &self.understated
    }
}
