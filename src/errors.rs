use std::fmt::Debug;
use std::path::PathBuf;
use thiserror::Error;


/// Errors raised by `HashtableMap`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    /// Caller supplied a malformed argument (e.g. zero capacity)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// No entry is stored under the requested key
    #[error("key not found")]
    NotFound,
}


/// Errors raised by `WeightedDigraph` and the shortest path engine
/// N: node identifier, kept so callers can inspect which node failed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError<N: Debug> {
    #[error("node {0:?} not found")]
    NodeNotFound(N),
    #[error("no edge from {from:?} to {to:?}")]
    EdgeNotFound { from: N, to: N },
    // Search requires weights >= 0
    #[error("edge weight {weight} from {from:?} to {to:?} must be finite and non-negative")]
    InvalidWeight { from: N, to: N, weight: f64 },
    // Search exhausted the frontier without reaching the end node
    #[error("no path from {start:?} to {end:?}")]
    NoPathFound { start: N, end: N },
}

impl<N: Debug> GraphError<N> {

    /// True when the error means "the graph has no route", as opposed to bad input
    pub fn is_no_path(&self) -> bool {
        matches!(self, GraphError::NoPathFound { .. })
    }
}


/// Errors raised while loading a route network from a DOT edge list
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("trouble reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },
    #[error(transparent)]
    Graph(#[from] GraphError<String>),
}
