use crate::collections::{FxIndexMap, FxIndexSet, HashtableMap};
use crate::errors::GraphError;

use std::{fmt::Debug, hash::Hash};
use num_traits::AsPrimitive;


/// Per-node adjacency
/// leaving: successor -> weight, in insertion order
/// entering: nodes with an edge into this one, used to unlink on removal
#[derive(Debug, Clone)]
struct Node<N, W> {
    leaving: FxIndexMap<N, W>,
    entering: FxIndexSet<N>,
}

impl<N, W> Node<N, W> {
    fn new() -> Self {
        Self {
            leaving: FxIndexMap::default(),
            entering: FxIndexSet::default(),
        }
    }
}


/// Directed graph with weighted edges
/// N: node identifier - any hashable, comparable value
/// W: edge weight - any primitive number, converted to f64 for path costs
///
/// Nodes are indexed by a `HashtableMap`. There is at most one edge per
/// ordered (source, successor) pair; inserting it again updates the weight.
#[derive(Debug, Clone)]
pub struct WeightedDigraph<N, W> {
    nodes: HashtableMap<N, Node<N, W>>,
    edge_count: usize,
}

impl<N, W> WeightedDigraph<N, W>
where
    N: Eq + Hash + Clone + Debug,
    W: AsPrimitive<f64>,
{

    pub fn new() -> Self {
        Self {
            nodes: HashtableMap::new(),
            edge_count: 0,
        }
    }

    /// Add a node, returns false if the identifier was already present
    pub fn insert_node(&mut self, id: N) -> bool {
        if self.nodes.contains_key(&id) {
            return false;
        }
        self.nodes.put(id, Node::new());
        true
    }

    /// Remove a node along with every edge entering or leaving it
    pub fn remove_node(&mut self, id: &N) -> Result<(), GraphError<N>> {
        let node = self.nodes
            .remove(id)
            .map_err(|_| GraphError::NodeNotFound(id.clone()))?;

        let self_loop = node.leaving.contains_key(id);
        self.edge_count -= node.leaving.len() + node.entering.len() - usize::from(self_loop);

        // a self loop points back at the removed node, so lookups for it just miss
        for successor in node.leaving.keys() {
            if let Ok(other) = self.nodes.get_mut(successor) {
                other.entering.shift_remove(id);
            }
        }
        for predecessor in node.entering.iter() {
            if let Ok(other) = self.nodes.get_mut(predecessor) {
                other.leaving.shift_remove(id);
            }
        }
        Ok(())
    }

    pub fn contains_node(&self, id: &N) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Every node identifier, in no particular order
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.nodes.keys()
    }

    /// Every edge as (source, successor, weight)
    pub fn edges(&self) -> impl Iterator<Item = (&N, &N, W)> {
        self.nodes.iter().flat_map(|(source, node)| {
            node.leaving.iter().map(move |(successor, &weight)| (source, successor, weight))
        })
    }

    /// Insert the edge source -> successor, or update its weight
    /// Returns the previous weight if the edge already existed
    pub fn insert_edge(&mut self, source: N, successor: N, weight: W) -> Result<Option<W>, GraphError<N>> {
        for endpoint in [&source, &successor] {
            if !self.nodes.contains_key(endpoint) {
                return Err(GraphError::NodeNotFound(endpoint.clone()));
            }
        }

        let value: f64 = weight.as_();
        if !value.is_finite() || value < 0.0 {
            return Err(GraphError::InvalidWeight { from: source, to: successor, weight: value });
        }

        let previous = self.node_mut(&source)?.leaving.insert(successor.clone(), weight);
        self.node_mut(&successor)?.entering.insert(source);

        if previous.is_none() {
            self.edge_count += 1;
        }
        Ok(previous)
    }

    /// Remove the edge source -> successor, returning its weight
    pub fn remove_edge(&mut self, source: &N, successor: &N) -> Result<W, GraphError<N>> {
        self.node(successor)?;
        let weight = self.node_mut(source)?
            .leaving
            .shift_remove(successor)
            .ok_or_else(|| edge_not_found(source, successor))?;

        self.node_mut(successor)?.entering.shift_remove(source);
        self.edge_count -= 1;
        Ok(weight)
    }

    /// Weight of the edge source -> successor
    pub fn get_edge(&self, source: &N, successor: &N) -> Result<W, GraphError<N>> {
        self.node(successor)?;
        self.node(source)?
            .leaving
            .get(successor)
            .copied()
            .ok_or_else(|| edge_not_found(source, successor))
    }

    pub fn contains_edge(&self, source: &N, successor: &N) -> bool {
        self.get_edge(source, successor).is_ok()
    }

    /// Outgoing edges of `id` as (successor, weight), in insertion order
    pub fn successors<'a>(&'a self, id: &N) -> Result<impl Iterator<Item = (&'a N, W)> + use<'a, N, W>, GraphError<N>> {
        Ok(self.node(id)?.leaving.iter().map(|(successor, &weight)| (successor, weight)))
    }

    /// Nodes with an edge leading into `id`
    pub fn predecessors<'a>(&'a self, id: &N) -> Result<impl Iterator<Item = &'a N> + use<'a, N, W>, GraphError<N>> {
        Ok(self.node(id)?.entering.iter())
    }

    fn node(&self, id: &N) -> Result<&Node<N, W>, GraphError<N>> {
        self.nodes.get(id).map_err(|_| GraphError::NodeNotFound(id.clone()))
    }

    fn node_mut(&mut self, id: &N) -> Result<&mut Node<N, W>, GraphError<N>> {
        self.nodes.get_mut(id).map_err(|_| GraphError::NodeNotFound(id.clone()))
    }
}

impl<N, W> Default for WeightedDigraph<N, W>
where
    N: Eq + Hash + Clone + Debug,
    W: AsPrimitive<f64>,
{
    fn default() -> Self {
        Self::new()
    }
}


fn edge_not_found<N: Clone + Debug>(source: &N, successor: &N) -> GraphError<N> {
    GraphError::EdgeNotFound { from: source.clone(), to: successor.clone() }
}
