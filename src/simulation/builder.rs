//! Fluent construction of simulation runs.

use crate::data::SimulatedData;
use crate::error::{BnResult, ValidationError};
use crate::evidence::{Evidence, FixedValue};
use crate::network::Network;

use super::config::{SimulationConfig, DEFAULT_ROWS};

/// Builder for [`SimulationConfig`].
///
/// # Examples
///
/// ```
/// use bnsim::{ConditionalTable, FixedValue, Network, Node, SimulateBuilder};
///
/// let network = Network::builder()
///     .node(Node::categorical(
///         "coin",
///         &[],
///         ConditionalTable::marginal(vec!["heads".into(), "tails".into()], vec![0.5, 0.5]),
///     ))
///     .build()
///     .unwrap();
///
/// let data = SimulateBuilder::new()
///     .rows(20)
///     .seed(7)
///     .fix("coin", FixedValue::level("tails"))
///     .run(&network)
///     .unwrap();
/// assert!(data.discrete("coin").unwrap().codes().iter().all(|c| *c == Some(1)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SimulateBuilder {
    rows: Option<usize>,
    seed: Option<u64>,
    trace: bool,
    evidence: Evidence,
}

impl SimulateBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of rows.
    #[must_use]
    pub fn rows(mut self, rows: usize) -> Self {
        self.rows = Some(rows);
        self
    }

    /// Seed the generator.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enable per-node debug events.
    #[must_use]
    pub fn trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Fix one node.
    #[must_use]
    pub fn fix(mut self, node: impl Into<String>, value: FixedValue) -> Self {
        self.evidence.insert(node, value);
        self
    }

    /// Replace all fixed nodes.
    #[must_use]
    pub fn evidence(mut self, evidence: Evidence) -> Self {
        self.evidence = evidence;
        self
    }

    /// Build the config.
    pub fn build(self) -> Result<SimulationConfig, ValidationError> {
        let config = SimulationConfig {
            rows: self.rows.unwrap_or(DEFAULT_ROWS),
            seed: self.seed,
            trace: self.trace,
            evidence: self.evidence,
        };
        config.validate()?;
        Ok(config)
    }

    /// Build the config and run it against `network`.
    pub fn run(self, network: &Network) -> BnResult<SimulatedData> {
        self.build()?.run(network)
    }
}
