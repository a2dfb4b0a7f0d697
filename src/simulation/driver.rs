//! Forward sampling of a whole network.

use rand::Rng;
use tracing::{debug, debug_span, warn};

use crate::data::{PartialTable, SimulatedData, SimulationWarning};
use crate::error::{BnError, BnResult};
use crate::evidence::Evidence;
use crate::graph;
use crate::network::{Network, Node, NodeModel};
use crate::sampling::{discrete, gaussian};

use super::RunId;

/// Draws `rows` joint observations from the network.
///
/// Nodes are visited parents-first; each one is sampled from its local
/// distribution given the rows already generated for its parents, unless
/// `evidence` fixes it. All draws come from `rng`, node after node and row
/// after row, so the same generator state reproduces the same table.
///
/// With `trace` set, debug events report the visiting order and each node as it
/// is simulated. Parent configurations that cannot be sampled from leave missing
/// values and produce one [`SimulationWarning`] per node.
///
/// # Errors
///
/// Fails if `evidence` names an unknown node or a value that does not fit its
/// node. No partial table is returned.
///
/// # Examples
///
/// ```
/// use bnsim::{simulate, Evidence, Network, Node};
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let network = Network::builder()
///     .node(Node::gaussian("X", &[], vec![1.0], 0.5))
///     .node(Node::gaussian("Y", &["X"], vec![0.0, 2.0], 0.1))
///     .build()
///     .unwrap();
/// let mut rng = ChaCha8Rng::seed_from_u64(42);
/// let data = simulate(&network, 10, &Evidence::new(), &mut rng, false).unwrap();
/// assert_eq!(data.nrows(), 10);
/// assert_eq!(data.ncols(), 2);
/// ```
pub fn simulate<R: Rng + ?Sized>(
    network: &Network,
    rows: usize,
    evidence: &Evidence,
    rng: &mut R,
    trace: bool,
) -> BnResult<SimulatedData> {
    let run = RunId::new();
    let span = debug_span!("simulate", run = %run, rows, nodes = network.len());
    let _entered = span.enter();

    let fixed = evidence.resolve(network)?;
    let roots = graph::root_nodes(network);
    let depths = graph::node_depths(network, &roots);
    let order = graph::order_nodes(network, &depths)?;

    if trace {
        let names: Vec<&str> = order
            .iter()
            .filter_map(|&i| network.node_at(i))
            .map(Node::name)
            .collect();
        debug!("partial node ordering is: {}", names.join(" "));
    }

    let mut table = PartialTable::allocate(network, rows);
    let mut warnings = Vec::new();

    for &index in &order {
        let node = network
            .node_at(index)
            .ok_or_else(|| BnError::internal(format!("no node at index {index}")))?;
        let fixed = fixed.get(index).and_then(Option::as_ref);
        if trace {
            trace_node(node, fixed.is_some());
        }

        match node.model() {
            NodeModel::Categorical(cpt) | NodeModel::Ordinal(cpt) => {
                let draw = if node.is_root() {
                    discrete::sample_root(cpt, rows, fixed, rng)?
                } else {
                    let parents = table.discrete_parents(network, node)?;
                    discrete::sample_conditional(cpt, rows, &parents, fixed, rng)?
                };
                if draw.degenerate_rows > 0 {
                    let node_name = node.name().to_string();
                    let rows = draw.degenerate_rows;
                    let warning = if node.is_root() {
                        SimulationWarning::DegenerateMarginal { node: node_name, rows }
                    } else {
                        SimulationWarning::DegenerateConfigurations { node: node_name, rows }
                    };
                    warn!(node = node.name(), rows = draw.degenerate_rows, "{warning}");
                    warnings.push(warning);
                }
                table.write_discrete(index, node, draw.codes)?;
            }
            NodeModel::Gaussian(model) => {
                let values = {
                    let parents = table.continuous_parents(network, node)?;
                    gaussian::sample(model, rows, &parents, fixed, rng)?
                };
                table.write_continuous(index, values)?;
            }
        }
    }

    table.finish(warnings)
}

fn trace_node(node: &Node, fixed: bool) {
    match (node.is_root(), fixed) {
        (true, true) => debug!("node {} is fixed", node.name()),
        (true, false) => debug!("simulating node {}, which doesn't have any parent", node.name()),
        (false, true) => debug!("node {} is fixed, ignoring parents", node.name()),
        (false, false) => debug!(
            "simulating node {} with parents {}",
            node.name(),
            node.parents().join(", ")
        ),
    }
}

#[cfg(test)]
mod tests {
    use rand::{RngCore, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use tracing_test::traced_test;

    use super::*;
    use crate::data::Column;
    use crate::evidence::FixedValue;
    use crate::network::ConditionalTable;

    fn yes_no(p_yes: f64) -> ConditionalTable {
        ConditionalTable::marginal(vec!["no".into(), "yes".into()], vec![1.0 - p_yes, p_yes])
    }

    // A -> B, with B's slice for A = "yes" never observed
    fn unobserved_configuration() -> Network {
        Network::builder()
            .node(Node::categorical("A", &[], yes_no(0.5)))
            .node(Node::categorical(
                "B",
                &["A"],
                ConditionalTable::new(
                    vec!["no".into(), "yes".into()],
                    vec![2, 2],
                    vec![0.3, 0.7, 0.0, 0.0],
                ),
            ))
            .build()
            .unwrap()
    }

    #[test]
    fn zero_rows_consume_no_draws() {
        let network = unobserved_configuration();
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let mut untouched = rng.clone();
        let data = simulate(&network, 0, &Evidence::new(), &mut rng, false).unwrap();
        assert_eq!(data.nrows(), 0);
        assert_eq!(data.ncols(), 2);
        assert!(data.columns().iter().all(Column::is_empty));
        assert_eq!(rng.next_u64(), untouched.next_u64());
    }

    #[test]
    fn warns_once_per_node() {
        let network = unobserved_configuration();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let data = simulate(&network, 200, &Evidence::new(), &mut rng, false).unwrap();

        let a = data.discrete("A").unwrap();
        let b = data.discrete("B").unwrap();
        for (pa, pb) in a.codes().iter().zip(b.codes()) {
            assert_eq!(pb.is_none(), *pa == Some(1));
        }
        assert_eq!(data.warnings().len(), 1);
        assert_eq!(data.warnings()[0].node(), "B");
    }

    #[traced_test]
    #[test]
    fn trace_lines_describe_each_node() {
        let network = unobserved_configuration();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let evidence = Evidence::new().fix("A", FixedValue::level("no"));
        let _ = simulate(&network, 5, &evidence, &mut rng, true).unwrap();
        assert!(logs_contain("partial node ordering is: A B"));
        assert!(logs_contain("node A is fixed"));
        assert!(logs_contain("simulating node B with parents A"));
    }

    #[traced_test]
    #[test]
    fn degenerate_rows_are_logged_as_warning() {
        let network = unobserved_configuration();
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let evidence = Evidence::new().fix("A", FixedValue::level("yes"));
        let data = simulate(&network, 10, &evidence, &mut rng, false).unwrap();
        assert_eq!(data.discrete("B").unwrap().missing(), 10);
        assert!(logs_contain("some configurations of the parents of B"));
        assert!(!logs_contain("simulating node"));
    }

    #[test]
    fn degenerate_root_gets_its_own_warning() {
        let network = Network::builder()
            .node(Node::categorical(
                "A",
                &[],
                ConditionalTable::marginal(vec!["no".into(), "yes".into()], vec![0.0, 0.0]),
            ))
            .build()
            .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let data = simulate(&network, 6, &Evidence::new(), &mut rng, false).unwrap();
        assert_eq!(data.discrete("A").unwrap().missing(), 6);
        assert_eq!(
            data.warnings(),
            &[SimulationWarning::DegenerateMarginal {
                node: "A".to_string(),
                rows: 6,
            }]
        );
    }
}
