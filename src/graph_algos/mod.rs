pub mod dijkstra;
mod shortest_path;

use shortest_path::shortest_path;


/// One candidate path explored during a search
/// node: last node on the path (borrowed from the graph)
/// cost: total edge weight from the start node
/// predecessor: arena index of the search node this path extends, None for the start
///
/// Search nodes are pushed into a per-query arena and never modified.
/// Finding a cheaper path to a node pushes a new search node instead.
#[derive(Debug)]
pub(crate) struct SearchNode<'a, N> {
    pub node: &'a N,
    pub cost: f64,
    pub predecessor: Option<usize>,
}
