//! Parameter counting for model-selection scores.
//!
//! A discrete node has one parameter per level for every parent configuration,
//! one fewer when only free parameters are counted. A Gaussian node has an
//! intercept plus one coefficient per parent.

use tracing::debug;

use crate::error::BnResult;
use crate::network::{Network, Node, NodeModel};

/// Total number of parameters of the network.
///
/// When `trace` is set, a debug event reports each node's count.
///
/// # Examples
///
/// ```
/// use bnsim::{count_network_params, Network, Node};
///
/// let network = Network::builder()
///     .node(Node::gaussian("X", &[], vec![0.0], 1.0))
///     .node(Node::gaussian("Y", &["X"], vec![0.0, 2.0], 1.0))
///     .build()
///     .unwrap();
/// assert_eq!(count_network_params(&network, true, false), 3);
/// ```
#[must_use]
pub fn count_network_params(network: &Network, count_free_params: bool, trace: bool) -> u64 {
    network
        .nodes()
        .iter()
        .map(|node| {
            let params = local_params(network, node, count_free_params);
            if trace {
                debug!(node = node.name(), params, "node {} has {} parameter(s)", node.name(), params);
            }
            params
        })
        .sum()
}

/// Number of parameters of a single node.
pub fn count_node_params(network: &Network, name: &str, count_free_params: bool) -> BnResult<u64> {
    let node = network.require(name)?;
    Ok(local_params(network, node, count_free_params))
}

fn local_params(network: &Network, node: &Node, count_free_params: bool) -> u64 {
    match node.model() {
        NodeModel::Categorical(table) | NodeModel::Ordinal(table) => {
            let configurations: u64 = node
                .parents()
                .iter()
                .filter_map(|p| network.node(p))
                .filter_map(|p| p.model().cardinality())
                .map(|c| c as u64)
                .product();
            let levels = table.cardinality() as u64;
            let per_configuration = if count_free_params {
                levels.saturating_sub(1)
            } else {
                levels
            };
            configurations.saturating_mul(per_configuration)
        }
        NodeModel::Gaussian(_) => node.parents().len() as u64 + 1,
    }
}
