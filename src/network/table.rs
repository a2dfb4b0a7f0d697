//! Conditional probability tables for discrete nodes.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Dense conditional probability table.
///
/// Logically shaped `[levels(node), levels(parent_1), ..., levels(parent_k)]` and
/// stored column-major: the node's level varies fastest, then the first parent,
/// and so on. For every parent configuration the node-level slice is expected to
/// sum to one; this is not checked, and slices that cannot be sampled from are
/// reported when the table is used.
///
/// # Examples
///
/// ```
/// use bnsim::ConditionalTable;
///
/// let table = ConditionalTable::marginal(vec!["yes".into(), "no".into()], vec![0.3, 0.7]);
/// assert_eq!(table.cardinality(), 2);
/// assert_eq!(table.slice(0), Some(&[0.3, 0.7][..]));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalTable {
    levels: Vec<String>,
    dims: Vec<usize>,
    probabilities: Vec<f64>,
}

impl ConditionalTable {
    /// Creates a table from its level labels, dimensions and flattened values.
    ///
    /// The shape is checked against the node's parents when the table is added
    /// to a network.
    #[must_use]
    pub fn new(levels: Vec<String>, dims: Vec<usize>, probabilities: Vec<f64>) -> Self {
        Self {
            levels,
            dims,
            probabilities,
        }
    }

    /// Creates an unconditional table for a node without parents.
    #[must_use]
    pub fn marginal(levels: Vec<String>, probabilities: Vec<f64>) -> Self {
        let dims = vec![levels.len()];
        Self::new(levels, dims, probabilities)
    }

    /// Level labels of the node, in code order.
    #[must_use]
    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    /// Number of levels of the node.
    #[must_use]
    pub fn cardinality(&self) -> usize {
        self.levels.len()
    }

    /// Full dimension vector, node first.
    #[must_use]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Cardinalities of the parents, in parent order.
    #[must_use]
    pub fn parent_cardinalities(&self) -> &[usize] {
        self.dims.get(1..).unwrap_or(&[])
    }

    /// Number of distinct parent configurations, saturating at `usize::MAX`.
    #[must_use]
    pub fn configurations(&self) -> usize {
        self.parent_cardinalities()
            .iter()
            .fold(1usize, |acc, &card| acc.saturating_mul(card))
    }

    /// Flattened probabilities.
    #[must_use]
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Node-level slice for one flattened parent configuration.
    #[must_use]
    pub fn slice(&self, configuration: usize) -> Option<&[f64]> {
        let n = self.cardinality();
        let start = configuration.checked_mul(n)?;
        self.probabilities.get(start..start + n)
    }

    /// Code of the level with the given label.
    #[must_use]
    pub fn level_index(&self, label: &str) -> Option<usize> {
        self.levels.iter().position(|l| l == label)
    }

    /// Checks the table against the cardinalities of the node's parents.
    pub(crate) fn validate(&self, node: &str, parent_cards: &[usize]) -> Result<(), ValidationError> {
        if self.levels.is_empty() {
            return Err(ValidationError::EmptyLevels {
                node: node.to_string(),
            });
        }

        let mut expected = Vec::with_capacity(parent_cards.len() + 1);
        expected.push(self.levels.len());
        expected.extend_from_slice(parent_cards);
        if self.dims != expected {
            return Err(ValidationError::TableShapeMismatch {
                node: node.to_string(),
                expected,
                actual: self.dims.clone(),
            });
        }

        let size = expected
            .iter()
            .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
            .ok_or_else(|| ValidationError::TableTooLarge {
                node: node.to_string(),
                dims: expected.clone(),
            })?;
        if self.probabilities.len() != size {
            return Err(ValidationError::TableSizeMismatch {
                node: node.to_string(),
                expected: size,
                actual: self.probabilities.len(),
            });
        }

        Ok(())
    }
}
