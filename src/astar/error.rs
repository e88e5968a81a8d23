// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

/// Error conditions which may occur during [find_route](crate::find_route).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// The start or end nodes don't exist in a graph.
    #[error("invalid node: {0}")]
    InvalidReference(i64),

    /// The end node can't be reached from the start node by following directed edges.
    #[error("no path from {from} to {to}")]
    NoPath { from: i64, to: i64 },
}
