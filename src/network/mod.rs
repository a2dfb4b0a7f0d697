//! Fitted Bayesian networks.
//!
//! A [`Network`] is an ordered collection of [`Node`]s, each carrying its parent
//! list and one of three local distributions. Networks are validated once, when
//! they are built; the sampling and counting code relies on that validation and
//! never mutates a network.

pub mod regression;
pub mod table;

pub use regression::LinearGaussian;
pub use table::ConditionalTable;

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BnError, BnResult, ExecutionError, ValidationError};
use crate::graph;

/// Local distribution of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeModel {
    /// Unordered discrete variable.
    Categorical(ConditionalTable),
    /// Ordered discrete variable. Sampled exactly like a categorical one.
    Ordinal(ConditionalTable),
    /// Linear-Gaussian continuous variable.
    Gaussian(LinearGaussian),
}

/// Distribution family of a node, without its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Unordered discrete.
    Categorical,
    /// Ordered discrete.
    Ordinal,
    /// Continuous.
    Gaussian,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Categorical => write!(f, "categorical"),
            Self::Ordinal => write!(f, "ordinal"),
            Self::Gaussian => write!(f, "gaussian"),
        }
    }
}

impl NodeModel {
    /// Distribution family.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Categorical(_) => NodeKind::Categorical,
            Self::Ordinal(_) => NodeKind::Ordinal,
            Self::Gaussian(_) => NodeKind::Gaussian,
        }
    }

    /// Returns true for categorical and ordinal nodes.
    #[must_use]
    pub const fn is_discrete(&self) -> bool {
        !matches!(self, Self::Gaussian(_))
    }

    /// Probability table of a discrete node.
    #[must_use]
    pub const fn table(&self) -> Option<&ConditionalTable> {
        match self {
            Self::Categorical(t) | Self::Ordinal(t) => Some(t),
            Self::Gaussian(_) => None,
        }
    }

    /// Number of levels of a discrete node.
    #[must_use]
    pub fn cardinality(&self) -> Option<usize> {
        self.table().map(ConditionalTable::cardinality)
    }
}

/// A named random variable with its parents and local distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    name: String,
    #[serde(default)]
    parents: Vec<String>,
    #[serde(flatten)]
    model: NodeModel,
}

impl Node {
    /// Creates a node from its parts.
    #[must_use]
    pub fn new(name: impl Into<String>, parents: Vec<String>, model: NodeModel) -> Self {
        Self {
            name: name.into(),
            parents,
            model,
        }
    }

    /// Creates a categorical node.
    #[must_use]
    pub fn categorical(name: impl Into<String>, parents: &[&str], table: ConditionalTable) -> Self {
        Self::new(name, owned(parents), NodeModel::Categorical(table))
    }

    /// Creates an ordinal node.
    #[must_use]
    pub fn ordinal(name: impl Into<String>, parents: &[&str], table: ConditionalTable) -> Self {
        Self::new(name, owned(parents), NodeModel::Ordinal(table))
    }

    /// Creates a linear-Gaussian node.
    #[must_use]
    pub fn gaussian(
        name: impl Into<String>,
        parents: &[&str],
        coefficients: Vec<f64>,
        residual_sd: f64,
    ) -> Self {
        Self::new(
            name,
            owned(parents),
            NodeModel::Gaussian(LinearGaussian::new(coefficients, residual_sd)),
        )
    }

    /// Node name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent names, in the order used by the local distribution.
    #[must_use]
    pub fn parents(&self) -> &[String] {
        &self.parents
    }

    /// Local distribution.
    #[must_use]
    pub const fn model(&self) -> &NodeModel {
        &self.model
    }

    /// Returns true if the node has no parents.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| (*s).to_string()).collect()
}

/// A validated, acyclic Bayesian network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NetworkDef", into = "NetworkDef")]
pub struct Network {
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
}

#[derive(Serialize, Deserialize)]
struct NetworkDef {
    nodes: Vec<Node>,
}

impl TryFrom<NetworkDef> for Network {
    type Error = ValidationError;

    fn try_from(def: NetworkDef) -> Result<Self, Self::Error> {
        Self::from_nodes(def.nodes)
    }
}

impl From<Network> for NetworkDef {
    fn from(network: Network) -> Self {
        Self {
            nodes: network.nodes,
        }
    }
}

impl Network {
    /// Starts building a network.
    #[must_use]
    pub fn builder() -> NetworkBuilder {
        NetworkBuilder::default()
    }

    /// Builds and validates a network from its nodes.
    pub fn from_nodes(nodes: Vec<Node>) -> Result<Self, ValidationError> {
        let mut index = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            if index.insert(node.name.clone(), i).is_some() {
                return Err(ValidationError::DuplicateNode {
                    name: node.name.clone(),
                });
            }
        }

        let network = Self { nodes, index };
        for node in &network.nodes {
            network.validate_node(node)?;
        }

        let stuck = graph::unreachable_nodes(&network);
        if !stuck.is_empty() {
            return Err(ValidationError::CyclicGraph {
                nodes: stuck
                    .into_iter()
                    .map(|i| network.nodes[i].name.clone())
                    .collect(),
            });
        }

        Ok(network)
    }

    /// Parses a network from its JSON description.
    pub fn from_json(json: &str) -> BnResult<Self> {
        let def: NetworkDef =
            serde_json::from_str(json).map_err(|e| ValidationError::MalformedNetwork {
                reason: e.to_string(),
            })?;
        Ok(Self::from_nodes(def.nodes)?)
    }

    /// Reads a network from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> BnResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serializes the network to pretty-printed JSON.
    pub fn to_json(&self) -> BnResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| BnError::internal(format!("failed to serialize network: {e}")))
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the network has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in storage order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Node names in storage order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(Node::name)
    }

    /// Storage index of a node.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Looks a node up by name.
    #[must_use]
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.index_of(name).map(|i| &self.nodes[i])
    }

    /// Looks a node up by storage index.
    #[must_use]
    pub fn node_at(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    /// Looks a node up by name, failing if it does not exist.
    pub fn require(&self, name: &str) -> Result<&Node, ExecutionError> {
        self.node(name).ok_or_else(|| ExecutionError::NodeNotFound {
            name: name.to_string(),
        })
    }

    /// Storage indices of a node's parents, in parent order.
    pub(crate) fn parent_indices(&self, node: &Node) -> Vec<usize> {
        node.parents
            .iter()
            .filter_map(|p| self.index_of(p))
            .collect()
    }

    fn validate_node(&self, node: &Node) -> Result<(), ValidationError> {
        let mut seen = HashSet::with_capacity(node.parents.len());
        let mut parents = Vec::with_capacity(node.parents.len());
        for name in &node.parents {
            if !seen.insert(name.as_str()) {
                return Err(ValidationError::RepeatedParent {
                    node: node.name.clone(),
                    parent: name.clone(),
                });
            }
            let parent = self.node(name).ok_or_else(|| ValidationError::UnknownParent {
                node: node.name.clone(),
                parent: name.clone(),
            })?;
            parents.push(parent);
        }

        match &node.model {
            NodeModel::Categorical(table) | NodeModel::Ordinal(table) => {
                let mut cards = Vec::with_capacity(parents.len());
                for parent in &parents {
                    let card = parent.model.cardinality().ok_or_else(|| {
                        ValidationError::DiscreteParentRequired {
                            node: node.name.clone(),
                            parent: parent.name.clone(),
                        }
                    })?;
                    cards.push(card);
                }
                table.validate(&node.name, &cards)
            }
            NodeModel::Gaussian(gaussian) => {
                if let Some(parent) = parents.iter().find(|p| p.model.is_discrete()) {
                    return Err(ValidationError::ContinuousParentRequired {
                        node: node.name.clone(),
                        parent: parent.name.clone(),
                    });
                }
                gaussian.validate(&node.name, parents.len())
            }
        }
    }
}

/// Incremental construction of a [`Network`].
///
/// # Examples
///
/// ```
/// use bnsim::{ConditionalTable, Network, Node};
///
/// let network = Network::builder()
///     .node(Node::categorical(
///         "rain",
///         &[],
///         ConditionalTable::marginal(vec!["no".into(), "yes".into()], vec![0.8, 0.2]),
///     ))
///     .node(Node::gaussian("temp", &[], vec![15.0], 4.0))
///     .build()
///     .unwrap();
/// assert_eq!(network.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct NetworkBuilder {
    nodes: Vec<Node>,
}

impl NetworkBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node. Nodes may be added in any order.
    #[must_use]
    pub fn node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    /// Validates and builds the network.
    pub fn build(self) -> Result<Network, ValidationError> {
        Network::from_nodes(self.nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary(p: f64) -> ConditionalTable {
        ConditionalTable::marginal(vec!["a".into(), "b".into()], vec![p, 1.0 - p])
    }

    #[test]
    fn builds_mixed_network_in_any_order() {
        let child = ConditionalTable::new(
            vec!["x".into(), "y".into()],
            vec![2, 2],
            vec![0.9, 0.1, 0.4, 0.6],
        );
        let network = Network::builder()
            .node(Node::categorical("B", &["A"], child))
            .node(Node::categorical("A", &[], binary(0.5)))
            .node(Node::gaussian("G", &[], vec![0.0], 1.0))
            .build()
            .unwrap();

        assert_eq!(network.len(), 3);
        assert_eq!(network.index_of("A"), Some(1));
        assert_eq!(network.node("B").unwrap().parents(), &["A".to_string()]);
        assert_eq!(network.names().collect::<Vec<_>>(), vec!["B", "A", "G"]);
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = Network::builder()
            .node(Node::categorical("A", &[], binary(0.5)))
            .node(Node::categorical("A", &[], binary(0.5)))
            .build()
            .unwrap_err();
        assert!(matches!(err, ValidationError::DuplicateNode { .. }));
    }

    #[test]
    fn rejects_unknown_parent() {
        let err = Network::builder()
            .node(Node::gaussian("X", &["Y"], vec![0.0, 1.0], 1.0))
            .build()
            .unwrap_err();
        assert!(matches!(err, ValidationError::UnknownParent { .. }));
    }

    #[test]
    fn rejects_repeated_parent() {
        let err = Network::builder()
            .node(Node::gaussian("Y", &[], vec![0.0], 1.0))
            .node(Node::gaussian("X", &["Y", "Y"], vec![0.0, 1.0, 1.0], 1.0))
            .build()
            .unwrap_err();
        assert!(matches!(err, ValidationError::RepeatedParent { .. }));
    }

    #[test]
    fn rejects_mixed_parent_kinds() {
        let err = Network::builder()
            .node(Node::gaussian("G", &[], vec![0.0], 1.0))
            .node(Node::categorical(
                "D",
                &["G"],
                ConditionalTable::new(vec!["a".into()], vec![1, 1], vec![1.0]),
            ))
            .build()
            .unwrap_err();
        assert!(matches!(err, ValidationError::DiscreteParentRequired { .. }));

        let err = Network::builder()
            .node(Node::categorical("D", &[], binary(0.5)))
            .node(Node::gaussian("G", &["D"], vec![0.0, 1.0], 1.0))
            .build()
            .unwrap_err();
        assert!(matches!(err, ValidationError::ContinuousParentRequired { .. }));
    }

    #[test]
    fn rejects_table_that_ignores_parent_levels() {
        let three = ConditionalTable::marginal(
            vec!["1".into(), "2".into(), "3".into()],
            vec![0.2, 0.3, 0.5],
        );
        let child = ConditionalTable::new(vec!["x".into(), "y".into()], vec![2, 2], vec![0.5; 4]);
        let err = Network::builder()
            .node(Node::ordinal("P", &[], three))
            .node(Node::categorical("C", &["P"], child))
            .build()
            .unwrap_err();
        assert!(matches!(err, ValidationError::TableShapeMismatch { .. }));
    }

    #[test]
    fn rejects_table_too_large_to_address() {
        let ten: Vec<String> = (0..10).map(|i| i.to_string()).collect();
        let names: Vec<String> = (0..20).map(|i| format!("P{i}")).collect();
        let parents: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut dims = vec![2];
        dims.extend(std::iter::repeat(10).take(20));

        let builder = names.iter().fold(Network::builder(), |b, name| {
            b.node(Node::categorical(
                name.as_str(),
                &[],
                ConditionalTable::marginal(ten.clone(), vec![0.1; 10]),
            ))
        });
        let err = builder
            .node(Node::categorical(
                "C",
                &parents,
                ConditionalTable::new(vec!["no".into(), "yes".into()], dims, vec![0.5, 0.5]),
            ))
            .build()
            .unwrap_err();
        assert!(matches!(err, ValidationError::TableTooLarge { ref node, .. } if node == "C"));
    }

    #[test]
    fn rejects_cycles() {
        let err = Network::builder()
            .node(Node::gaussian("X", &["Y"], vec![0.0, 1.0], 1.0))
            .node(Node::gaussian("Y", &["X"], vec![0.0, 1.0], 1.0))
            .node(Node::gaussian("Z", &[], vec![0.0], 1.0))
            .build()
            .unwrap_err();
        let ValidationError::CyclicGraph { nodes } = err else {
            panic!("expected CyclicGraph");
        };
        assert_eq!(nodes, vec!["X".to_string(), "Y".to_string()]);
    }

    #[test]
    fn json_roundtrip_keeps_structure() {
        let network = Network::builder()
            .node(Node::ordinal("A", &[], binary(0.25)))
            .node(Node::gaussian("G", &[], vec![3.0], 0.5))
            .build()
            .unwrap();
        let json = network.to_json().unwrap();
        assert!(json.contains("\"type\": \"ordinal\""));
        let back = Network::from_json(&json).unwrap();
        assert_eq!(back, network);
    }

    #[test]
    fn from_json_reports_malformed_input() {
        let err = Network::from_json("{\"nodes\": [{\"name\": 1}]}").unwrap_err();
        assert!(matches!(
            err,
            BnError::Validation(ValidationError::MalformedNetwork { .. })
        ));
    }

    #[test]
    fn require_reports_missing_node() {
        let network = Network::builder()
            .node(Node::gaussian("G", &[], vec![0.0], 1.0))
            .build()
            .unwrap();
        assert!(network.require("G").is_ok());
        assert!(matches!(
            network.require("H"),
            Err(ExecutionError::NodeNotFound { .. })
        ));
    }
}
