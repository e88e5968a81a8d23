// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::fs::File;
use std::io;
use std::path::Path;

use crate::{Graph, GraphError, LoadOptions, NodeRecord};

/// Error conditions which may occur while loading a [Graph] from a JSON dataset.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("invalid waypoint dataset: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed graph: {0}")]
    Graph(#[from] GraphError),
}

/// Parse a JSON array of [NodeRecords](NodeRecord) from a reader into a [Graph].
///
/// The expected document looks like
/// `[{"id": 1, "position": [x, y], "neighbors": [{"id": 2, "distance": 12.5}]}, ...]`,
/// where `neighbors` and `distance` are optional. Unknown fields are ignored.
///
/// The provided stream will be automatically wrapped in a buffered reader.
pub fn load_from_json_reader<R: io::Read>(
    reader: R,
    options: &LoadOptions,
) -> Result<Graph, LoadError> {
    let records: Vec<NodeRecord> = serde_json::from_reader(io::BufReader::new(reader))?;
    Ok(Graph::load_with_options(records, options)?)
}

/// Parse a JSON waypoint dataset from a file at the provided path into a [Graph].
pub fn load_from_json_file<P: AsRef<Path>>(
    path: P,
    options: &LoadOptions,
) -> Result<Graph, LoadError> {
    let f = File::open(path)?;
    load_from_json_reader(f, options)
}

/// Parse a JSON waypoint dataset from an in-memory buffer into a [Graph].
pub fn load_from_json_slice(data: &[u8], options: &LoadOptions) -> Result<Graph, LoadError> {
    let records: Vec<NodeRecord> = serde_json::from_slice(data)?;
    Ok(Graph::load_with_options(records, options)?)
}
