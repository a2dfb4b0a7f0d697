//! Graph utilities over a network's parent relation.
//!
//! The simulation order is derived from node depths: roots have depth 0 and
//! every other node sits one level below its deepest parent. Sorting node
//! indices by depth, stably, puts every parent before its children.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::network::Network;

/// A directed arc between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Tail of the arc.
    pub from: String,
    /// Head of the arc.
    pub to: String,
}

impl Edge {
    /// Creates an arc.
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Indices of the nodes without parents, in storage order.
#[must_use]
pub fn root_nodes(network: &Network) -> Vec<usize> {
    network
        .nodes()
        .iter()
        .enumerate()
        .filter(|(_, node)| node.is_root())
        .map(|(i, _)| i)
        .collect()
}

/// Depth of every node, aligned to storage index, starting from `roots`.
///
/// Nodes that cannot be reached from `roots` keep depth 0.
#[must_use]
pub fn node_depths(network: &Network, roots: &[usize]) -> Vec<usize> {
    breadth_first(network, roots).0
}

/// Orders node indices by depth, keeping storage order among equal depths.
pub fn order_nodes(network: &Network, depths: &[usize]) -> Result<Vec<usize>, ValidationError> {
    if depths.len() != network.len() {
        return Err(ValidationError::DepthLengthMismatch {
            expected: network.len(),
            actual: depths.len(),
        });
    }
    Ok(sort_by_depth(depths))
}

/// The order in which a simulation visits the nodes.
#[must_use]
pub fn simulation_order(network: &Network) -> Vec<usize> {
    sort_by_depth(&node_depths(network, &root_nodes(network)))
}

fn sort_by_depth(depths: &[usize]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..depths.len()).collect();
    order.sort_by_key(|&i| depths[i]);
    order
}

/// Arcs of the network, parent to child, grouped by child in storage order.
#[must_use]
pub fn arcs(network: &Network) -> Vec<Edge> {
    network
        .nodes()
        .iter()
        .flat_map(|node| {
            node.parents()
                .iter()
                .map(move |parent| Edge::new(parent.as_str(), node.name()))
        })
        .collect()
}

/// Flattens per-node neighbour lists into an arc list.
///
/// Each `(node, neighbours)` entry contributes one `node -> neighbour` arc per
/// neighbour, in input order.
#[must_use]
pub fn neighbourhoods_to_arcs(neighbourhoods: &[(String, Vec<String>)]) -> Vec<Edge> {
    let narcs = neighbourhoods.iter().map(|(_, nbr)| nbr.len()).sum();
    let mut arcs = Vec::with_capacity(narcs);
    for (node, nbr) in neighbourhoods {
        for other in nbr {
            arcs.push(Edge::new(node.as_str(), other.as_str()));
        }
    }
    arcs
}

/// Nodes that never become ready when peeling roots off the graph, in storage
/// order. Non-empty only for cyclic parent relations.
pub(crate) fn unreachable_nodes(network: &Network) -> Vec<usize> {
    let (_, visited) = breadth_first(network, &root_nodes(network));
    visited
        .iter()
        .enumerate()
        .filter(|(_, seen)| !**seen)
        .map(|(i, _)| i)
        .collect()
}

fn breadth_first(network: &Network, roots: &[usize]) -> (Vec<usize>, Vec<bool>) {
    let n = network.len();
    let mut children = vec![Vec::new(); n];
    let mut pending = vec![0usize; n];
    for (i, node) in network.nodes().iter().enumerate() {
        for p in network.parent_indices(node) {
            children[p].push(i);
            pending[i] += 1;
        }
    }

    let mut depths = vec![0usize; n];
    let mut visited = vec![false; n];
    let mut queue: VecDeque<usize> = roots.iter().copied().filter(|&r| r < n).collect();
    while let Some(cur) = queue.pop_front() {
        if visited[cur] {
            continue;
        }
        visited[cur] = true;
        for &child in &children[cur] {
            depths[child] = depths[child].max(depths[cur] + 1);
            pending[child] -= 1;
            if pending[child] == 0 {
                queue.push_back(child);
            }
        }
    }

    (depths, visited)
}
