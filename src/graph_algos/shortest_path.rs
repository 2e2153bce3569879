use super::SearchNode;

/// Construct the shortest path from the goal node to the start node
/// Returns the ordered path as a vector of nodes from start to goal
/// search_nodes: arena built by the search
/// goal_index: index of the goal search node in the arena
pub(crate) fn shortest_path<N>(search_nodes: &[SearchNode<'_, N>], goal_index: usize) -> Vec<N>
where
    N: Clone,
{

    let mut path = Vec::new();
    let mut current = Some(goal_index);

    // Trace back from goal to start
    while let Some(index) = current {
        let search_node = &search_nodes[index];
        path.push(search_node.node.clone());
        current = search_node.predecessor;
    }

    // The path is in reverse order, so reverse it
    path.reverse();
    path
}
