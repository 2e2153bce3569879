use crate::errors::GraphError;
use crate::collections::HashtableMap;
use crate::graph::WeightedDigraph;
use super::{shortest_path, SearchNode};

use std::{collections::BinaryHeap, hash::Hash, cmp::Ordering, fmt::Debug};
use num_traits::AsPrimitive;
use tracing::{debug, trace};


/// Search nodes allocated by one query, the settled costs, and the goal's arena index if reached
type SearchTree<'a, N> = (Vec<SearchNode<'a, N>>, HashtableMap<&'a N, f64>, Option<usize>);


/// Nodes on the shortest path from start to end, both included
/// https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm
pub fn shortest_path_data<N, W>(graph: &WeightedDigraph<N, W>, start: &N, end: &N) -> Result<Vec<N>, GraphError<N>>
where
    N: Eq + Hash + Clone + Debug,
    W: AsPrimitive<f64>,
{
    let (search_nodes, goal_index) = compute_shortest_path(graph, start, end)?;
    Ok(shortest_path(&search_nodes, goal_index))
}


/// Sum of edge weights along the shortest path from start to end
pub fn shortest_path_cost<N, W>(graph: &WeightedDigraph<N, W>, start: &N, end: &N) -> Result<f64, GraphError<N>>
where
    N: Eq + Hash + Clone + Debug,
    W: AsPrimitive<f64>,
{
    let (search_nodes, goal_index) = compute_shortest_path(graph, start, end)?;
    Ok(search_nodes[goal_index].cost)
}


/// Shortest path from start to end that passes through via
/// Two independent searches (start -> via, via -> end) joined at via, which appears once.
/// If either leg has no path the whole query reports NoPathFound for start -> end.
pub fn shortest_path_via<N, W>(graph: &WeightedDigraph<N, W>, start: &N, via: &N, end: &N) -> Result<Vec<N>, GraphError<N>>
where
    N: Eq + Hash + Clone + Debug,
    W: AsPrimitive<f64>,
{
    let mut path = via_leg(shortest_path_data(graph, start, via), start, end)?;
    let second_leg = via_leg(shortest_path_data(graph, via, end), start, end)?;

    // first leg ends with via, second leg starts with it
    path.pop();
    path.extend(second_leg);
    Ok(path)
}


/// Cost of `shortest_path_via`
pub fn shortest_path_cost_via<N, W>(graph: &WeightedDigraph<N, W>, start: &N, via: &N, end: &N) -> Result<f64, GraphError<N>>
where
    N: Eq + Hash + Clone + Debug,
    W: AsPrimitive<f64>,
{
    let first = via_leg(shortest_path_cost(graph, start, via), start, end)?;
    let second = via_leg(shortest_path_cost(graph, via, end), start, end)?;
    Ok(first + second)
}


/// Returns the settled cost of every node reachable from start
pub fn shortest_path_costs<N, W>(graph: &WeightedDigraph<N, W>, start: &N) -> Result<HashtableMap<N, f64>, GraphError<N>>
where
    N: Eq + Hash + Clone + Debug,
    W: AsPrimitive<f64>,
{
    if !graph.contains_node(start) {
        return Err(GraphError::NodeNotFound(start.clone()));
    }

    // never stop early - explore until the frontier is empty
    let (_, settled, _) = build_search_tree(graph, start, |_| false)?;

    Ok(settled.iter().map(|(&node, &cost)| (node.clone(), cost)).collect())
}


/// Runs the search between two existing nodes
/// Returns the search arena and the index of the goal search node
fn compute_shortest_path<'a, N, W>(graph: &'a WeightedDigraph<N, W>, start: &'a N, end: &N) -> Result<(Vec<SearchNode<'a, N>>, usize), GraphError<N>>
where
    N: Eq + Hash + Clone + Debug,
    W: AsPrimitive<f64>,
{
    // unknown endpoints are bad input, not a missing route
    for endpoint in [start, end] {
        if !graph.contains_node(endpoint) {
            return Err(GraphError::NodeNotFound(endpoint.clone()));
        }
    }

    debug!(?start, ?end, "searching for shortest path");
    let (search_nodes, _, goal_index) = build_search_tree(graph, start, |node| node == end)?;

    match goal_index {
        Some(goal_index) => {
            debug!(?start, ?end, cost = search_nodes[goal_index].cost, explored = search_nodes.len(), "shortest path found");
            Ok((search_nodes, goal_index))
        }
        None => Err(GraphError::NoPathFound {
            start: start.clone(),
            end: end.clone(),
        }),
    }
}


/// Traverses the graph using Dijkstra's algorithm
/// Returns the search arena, the settled cost map and the arena index of the goal node
fn build_search_tree<'a, N, W, G>(graph: &'a WeightedDigraph<N, W>, start: &'a N, goal_fn: G) -> Result<SearchTree<'a, N>, GraphError<N>>
where
    N: Eq + Hash + Clone + Debug,
    W: AsPrimitive<f64>,
    G: Fn(&N) -> bool, // Returns true if goal is met
{

    // Every path considered so far - frontier entries point into this arena
    let mut search_nodes: Vec<SearchNode<'a, N>> = vec![SearchNode {
        node: start,
        cost: 0.0,
        predecessor: None,
    }];

    // Nodes to visit - binary heap sorts Biggest to Smallest, NodeId reverses that
    // A node may be queued several times; the cheapest copy is popped first and the rest are stale
    let mut frontier: BinaryHeap<NodeId> = BinaryHeap::new();
    frontier.push(NodeId { index: 0, cost: 0.0 });

    // visited nodes - cost is final, no longer need to visit
    let mut settled: HashtableMap<&'a N, f64> = HashtableMap::new();

    // Loop over each node to visit, removing the cheapest
    while let Some(NodeId { index, cost }) = frontier.pop() {
        let node = search_nodes[index].node;

        // Check if we've reached the goal
        if goal_fn(node) {
            return Ok((search_nodes, settled, Some(index)));
        }

        // Already settled through a cheaper path
        if settled.contains_key(node) {
            continue;
        }
        settled.put(node, cost);
        trace!(?node, cost, "settled");

        // loop over neighbors
        for (successor, weight) in graph.successors(node)? {
            if settled.contains_key(successor) {
                continue;
            }

            // new cost to reach this node = edge cost + node cost
            let new_cost = cost + weight.as_();
            search_nodes.push(SearchNode {
                node: successor,
                cost: new_cost,
                predecessor: Some(index),
            });
            frontier.push(NodeId {
                index: search_nodes.len() - 1,
                cost: new_cost,
            });
        }
    }

    Ok((search_nodes, settled, None))
}


/// A failed leg fails the via query as a whole
fn via_leg<N: Debug + Clone, T>(leg: Result<T, GraphError<N>>, start: &N, end: &N) -> Result<T, GraphError<N>> {
    leg.map_err(|error| match error {
        GraphError::NoPathFound { start: from, end: to } => {
            debug!(?from, ?to, "via leg has no path");
            GraphError::NoPathFound {
                start: start.clone(),
                end: end.clone(),
            }
        }
        other => other,
    })
}


/// Query helpers so callers can ask the graph directly
impl<N, W> WeightedDigraph<N, W>
where
    N: Eq + Hash + Clone + Debug,
    W: AsPrimitive<f64>,
{
    pub fn shortest_path_data(&self, start: &N, end: &N) -> Result<Vec<N>, GraphError<N>> {
        shortest_path_data(self, start, end)
    }

    pub fn shortest_path_cost(&self, start: &N, end: &N) -> Result<f64, GraphError<N>> {
        shortest_path_cost(self, start, end)
    }

    pub fn shortest_path_via(&self, start: &N, via: &N, end: &N) -> Result<Vec<N>, GraphError<N>> {
        shortest_path_via(self, start, via, end)
    }

    pub fn shortest_path_cost_via(&self, start: &N, via: &N, end: &N) -> Result<f64, GraphError<N>> {
        shortest_path_cost_via(self, start, via, end)
    }

    pub fn shortest_path_costs(&self, start: &N) -> Result<HashtableMap<N, f64>, GraphError<N>> {
        shortest_path_costs(self, start)
    }
}


/// Frontier entry
/// - for ordering we only need cost and a way to identify the search node
#[derive(Debug)]
struct NodeId {
    index: usize,
    cost: f64,
}

impl Ord for NodeId {
    fn cmp(&self, other: &Self) -> Ordering {
        other.cost.total_cmp(&self.cost)
    }
}
impl PartialOrd for NodeId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl PartialEq for NodeId {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for NodeId {}
