//! # bnsim - Forward simulation for fitted Bayesian networks
//!
//! bnsim draws joint observations from a fitted Bayesian network, one node at a
//! time and parents first, optionally holding some nodes at fixed values to
//! generate counterfactual data. It also counts the parameters of a network's
//! local distributions for model-selection scores such as BIC.
//!
//! ## Core Concepts
//!
//! - **Network**: validated, acyclic set of nodes with ordered parent lists
//! - **NodeModel**: categorical or ordinal probability table, or linear-Gaussian regression
//! - **Evidence**: per-node fixed values (a level, a set of levels, a constant or an interval)
//! - **SimulatedData**: one typed column per node, with missing values where a
//!   parent configuration was never observed
//!
//! ## Usage
//!
//! ```rust
//! use bnsim::{count_network_params, ConditionalTable, Network, Node, SimulateBuilder};
//!
//! let network = Network::builder()
//!     .node(Node::categorical(
//!         "rain",
//!         &[],
//!         ConditionalTable::marginal(vec!["no".into(), "yes".into()], vec![0.8, 0.2]),
//!     ))
//!     .node(Node::categorical(
//!         "wet",
//!         &["rain"],
//!         ConditionalTable::new(
//!             vec!["no".into(), "yes".into()],
//!             vec![2, 2],
//!             vec![0.9, 0.1, 0.05, 0.95],
//!         ),
//!     ))
//!     .build()?;
//!
//! assert_eq!(count_network_params(&network, true, false), 3);
//!
//! let data = SimulateBuilder::new().rows(100).seed(42).run(&network)?;
//! assert_eq!(data.nrows(), 100);
//! # Ok::<(), bnsim::BnError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod data;
pub mod error;
pub mod evidence;
pub mod graph;
pub mod network;
pub mod params;
pub mod sampling;
pub mod simulation;

// Re-export primary types at crate root for convenience
pub use data::{Column, DiscreteColumn, SimulatedData, SimulationWarning};
pub use error::{BnError, BnResult, ExecutionError, ValidationError};
pub use evidence::{Evidence, FixedValue, LevelRef};
pub use graph::{
    arcs, neighbourhoods_to_arcs, node_depths, order_nodes, root_nodes, simulation_order, Edge,
};
pub use network::{
    ConditionalTable, LinearGaussian, Network, NetworkBuilder, Node, NodeKind, NodeModel,
};
pub use params::{count_network_params, count_node_params};
pub use sampling::configuration_index;
pub use simulation::{simulate, RunId, SimulateBuilder, SimulationConfig};
