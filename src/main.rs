use std::error::Error;
use std::path::{Path, PathBuf};

use clap::Parser;
use waypath::{self, Graph, KDTree, LoadOptions, Point};

#[derive(Debug, thiserror::Error)]
#[error("{0}: {1}")]
struct GraphLoadError(PathBuf, #[source] waypath::LoadError);

#[derive(Debug, thiserror::Error)]
#[error("route is {distance:.2} long, exceeding the limit of {limit:.2}")]
struct RouteTooLong {
    distance: f64,
    limit: f64,
}

#[derive(Parser)]
struct Cli {
    /// The path to the JSON waypoint dataset
    graph_file: PathBuf,

    /// X coordinate of the start point
    start_x: f64,

    /// Y coordinate of the start point
    start_y: f64,

    /// X coordinate of the end point
    end_x: f64,

    /// Y coordinate of the end point
    end_y: f64,

    /// Refuse routes longer than this distance
    #[arg(long)]
    max_distance: Option<f64>,

    /// Snap points using a k-d tree instead of scanning all nodes
    #[arg(long)]
    kd_tree: bool,

    /// Refuse edges with an explicit distance shorter than the straight line
    #[arg(long)]
    strict: bool,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    colog::init();
    let cli = Cli::parse();

    let options = LoadOptions {
        reject_understated: cli.strict,
    };
    let g = load_graph(&cli.graph_file, &options)?;

    let origin = Point::new(cli.start_x, cli.start_y);
    let destination = Point::new(cli.end_x, cli.end_y);

    let result = if cli.kd_tree {
        match KDTree::from_graph(&g) {
            Some(tree) => waypath::route_with(&g, &tree, origin, destination)?,
            None => return Err(waypath::RouteError::NoNodes.into()),
        }
    } else {
        waypath::route(&g, origin, destination)?
    };

    if let Some(limit) = cli.max_distance {
        if result.distance > limit {
            return Err(RouteTooLong {
                distance: result.distance,
                limit,
            }
            .into());
        }
    }

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn load_graph<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Graph, GraphLoadError> {
    match waypath::load_from_json_file(path.as_ref(), options) {
        Ok(g) => {
            log::info!("loaded {} waypoints from {}", g.len(), path.as_ref().display());
            Ok(g)
        }
        Err(e) => Err(GraphLoadError(PathBuf::from(path.as_ref()), e)),
    }
}
