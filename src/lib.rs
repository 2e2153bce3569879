//! Weighted directed graphs with Dijkstra shortest paths
//!
//! - `collections::HashtableMap` - chained hash map used as the graph's node index
//! - `graph::WeightedDigraph` - nodes keyed by any hashable identifier, weighted edges
//! - `graph_algos::dijkstra` - shortest path, cost, via-node and single-source queries
//! - `routes::RouteNetwork` - named locations loaded from a DOT edge list

pub mod collections;
pub mod errors;
pub mod graph;
pub mod graph_algos;
pub mod routes;

pub use collections::HashtableMap;
pub use errors::{GraphError, LoadError, MapError};
pub use graph::WeightedDigraph;
pub use routes::RouteNetwork;
