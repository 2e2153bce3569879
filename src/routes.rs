use crate::collections::FxIndexSet;
use crate::errors::{GraphError, LoadError};
use crate::graph::WeightedDigraph;

use std::path::Path;
use tracing::{debug, trace};


/// A directed route between two named locations, as read from a DOT edge list
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub from: String,
    pub to: String,
    pub weight: f64,
}


/// Parse a DOT edge list
///
/// Only edge statements are read, one per line:
/// `"Union South" -> "Memorial Union" [seconds=176.0];`
/// Quotes are optional and the first numeric attribute is the weight.
/// Lines without `->` (the `digraph {` header, `}`, node or graph attributes, comments) are skipped.
pub fn parse_dot(input: &str) -> Result<Vec<Route>, LoadError> {
    let mut routes = Vec::new();

    for (number, raw) in input.lines().enumerate() {
        let line = strip_comment(raw).trim();
        if line.starts_with('#') || !line.contains("->") {
            trace!(line = number + 1, "skipping non-edge line");
            continue;
        }

        let route = parse_edge(line).map_err(|reason| LoadError::Parse {
            line: number + 1,
            reason,
        })?;
        routes.push(route);
    }

    Ok(routes)
}

/// Drop a `//` comment, unless the slashes sit inside a quoted name
fn strip_comment(line: &str) -> &str {
    let mut in_quotes = false;
    let mut previous = None;

    for (index, c) in line.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            '/' if !in_quotes && previous == Some('/') => return &line[..index - 1],
            _ => {}
        }
        previous = Some(c);
    }
    line
}

fn parse_edge(line: &str) -> Result<Route, String> {
    let statement = line.trim_end_matches(';').trim_end();
    let (source, rest) = statement
        .split_once("->")
        .ok_or_else(|| "expected `->`".to_string())?;
    let (target, attributes) = rest
        .split_once('[')
        .ok_or_else(|| "expected an attribute list with the edge weight".to_string())?;

    let attributes = attributes
        .trim_end()
        .strip_suffix(']')
        .ok_or_else(|| "unterminated attribute list".to_string())?;

    // first key=value pair whose value is a number
    let weight = attributes
        .split(',')
        .filter_map(|pair| pair.split_once('='))
        .find_map(|(_, value)| value.trim().trim_matches('"').parse::<f64>().ok())
        .ok_or_else(|| format!("no numeric weight in `[{attributes}]`"))?;

    Ok(Route {
        from: location_name(source)?,
        to: location_name(target)?,
        weight,
    })
}

fn location_name(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    let name = trimmed
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(trimmed);

    if name.is_empty() {
        return Err("empty location name".to_string());
    }
    Ok(name.to_string())
}


/// Named locations joined by timed routes
///
/// Thin query layer over `WeightedDigraph<String, f64>` that remembers the
/// order locations were first seen. Every query returns the graph's errors
/// untouched; callers that want an empty list for "no path" can check
/// `GraphError::is_no_path`.
#[derive(Debug, Clone, Default)]
pub struct RouteNetwork {
    graph: WeightedDigraph<String, f64>,
    locations: FxIndexSet<String>,
}

impl RouteNetwork {

    pub fn new() -> Self {
        Self::default()
    }

    /// Build a network from DOT text
    pub fn from_dot_str(input: &str) -> Result<Self, LoadError> {
        let mut network = Self::new();
        for route in parse_dot(input)? {
            network.add_route(route.from, route.to, route.weight)?;
        }
        debug!(locations = network.locations.len(), routes = network.graph.edge_count(), "route network loaded");
        Ok(network)
    }

    /// Build a network from a DOT file
    pub fn load_dot_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_dot_str(&input)
    }

    /// Add both locations if needed, then the route between them
    /// Returns the previous travel time when the route already existed
    pub fn add_route(&mut self, from: String, to: String, seconds: f64) -> Result<Option<f64>, GraphError<String>> {
        for location in [&from, &to] {
            if self.graph.insert_node(location.clone()) {
                self.locations.insert(location.clone());
            }
        }
        self.graph.insert_edge(from, to, seconds)
    }

    /// Every known location, in the order first seen
    pub fn locations(&self) -> impl Iterator<Item = &str> {
        self.locations.iter().map(String::as_str)
    }

    pub fn graph(&self) -> &WeightedDigraph<String, f64> {
        &self.graph
    }

    pub fn find_shortest_path(&self, start: &str, end: &str) -> Result<Vec<String>, GraphError<String>> {
        self.graph.shortest_path_data(&start.to_string(), &end.to_string())
    }

    /// Total travel time of the shortest path
    pub fn total_travel_time(&self, start: &str, end: &str) -> Result<f64, GraphError<String>> {
        self.graph.shortest_path_cost(&start.to_string(), &end.to_string())
    }

    /// Travel time of each hop along the shortest path
    pub fn travel_times_on_path(&self, start: &str, end: &str) -> Result<Vec<f64>, GraphError<String>> {
        let path = self.find_shortest_path(start, end)?;
        self.hop_times(&path)
    }

    pub fn find_shortest_path_via(&self, start: &str, via: &str, end: &str) -> Result<Vec<String>, GraphError<String>> {
        self.graph.shortest_path_via(&start.to_string(), &via.to_string(), &end.to_string())
    }

    pub fn travel_times_on_path_via(&self, start: &str, via: &str, end: &str) -> Result<Vec<f64>, GraphError<String>> {
        let path = self.find_shortest_path_via(start, via, end)?;
        self.hop_times(&path)
    }

    /// Travel time of each hop along an already computed path
    pub fn hop_times(&self, path: &[String]) -> Result<Vec<f64>, GraphError<String>> {
        path.windows(2)
            .map(|hop| self.graph.get_edge(&hop[0], &hop[1]))
            .collect()
    }
}
