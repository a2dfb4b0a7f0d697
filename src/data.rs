//! Simulated data: one typed column per network node.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{BnError, BnResult, ExecutionError};
use crate::network::{Network, Node, NodeModel};

/// Codes of a discrete node, with the labels they stand for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscreteColumn {
    levels: Vec<String>,
    ordinal: bool,
    codes: Vec<Option<u32>>,
}

impl DiscreteColumn {
    /// Level labels, in code order.
    #[must_use]
    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    /// Returns true if the levels are ordered.
    #[must_use]
    pub const fn is_ordinal(&self) -> bool {
        self.ordinal
    }

    /// Zero-based level codes; `None` marks a missing value.
    #[must_use]
    pub fn codes(&self) -> &[Option<u32>] {
        &self.codes
    }

    /// Label of the value in `row`, if present.
    #[must_use]
    pub fn label(&self, row: usize) -> Option<&str> {
        let code = (*self.codes.get(row)?)?;
        self.levels.get(code as usize).map(String::as_str)
    }

    /// Number of rows per level.
    #[must_use]
    pub fn counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.levels.len()];
        for code in self.codes.iter().flatten() {
            if let Some(c) = counts.get_mut(*code as usize) {
                *c += 1;
            }
        }
        counts
    }

    /// Number of missing values.
    #[must_use]
    pub fn missing(&self) -> usize {
        self.codes.iter().filter(|c| c.is_none()).count()
    }
}

/// Values generated for one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "values", rename_all = "snake_case")]
pub enum Column {
    /// Categorical or ordinal node.
    Discrete(DiscreteColumn),
    /// Gaussian node.
    Continuous(Vec<f64>),
}

impl Column {
    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Discrete(d) => d.codes.len(),
            Self::Continuous(v) => v.len(),
        }
    }

    /// Returns true if the column has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Discrete view.
    #[must_use]
    pub const fn as_discrete(&self) -> Option<&DiscreteColumn> {
        match self {
            Self::Discrete(d) => Some(d),
            Self::Continuous(_) => None,
        }
    }

    /// Continuous view.
    #[must_use]
    pub fn as_continuous(&self) -> Option<&[f64]> {
        match self {
            Self::Continuous(v) => Some(v),
            Self::Discrete(_) => None,
        }
    }
}

/// A recoverable problem met while simulating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimulationWarning {
    /// Some rows hit parent configurations whose probabilities cannot be
    /// sampled from (never observed when the model was fitted); those rows
    /// are missing.
    DegenerateConfigurations {
        /// Node with the unusable slices.
        node: String,
        /// Rows left missing.
        rows: usize,
    },
    /// The marginal table of a node without parents cannot be sampled from;
    /// the whole column is missing.
    DegenerateMarginal {
        /// Node with the unusable table.
        node: String,
        /// Rows left missing.
        rows: usize,
    },
}

impl SimulationWarning {
    /// Node the warning is about.
    #[must_use]
    pub fn node(&self) -> &str {
        match self {
            Self::DegenerateConfigurations { node, .. } | Self::DegenerateMarginal { node, .. } => node,
        }
    }
}

impl fmt::Display for SimulationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegenerateConfigurations { node, rows } => write!(
                f,
                "some configurations of the parents of {node} are not present in the original data, \
                 {rows} missing value(s) generated"
            ),
            Self::DegenerateMarginal { node, rows } => write!(
                f,
                "the probabilities of {node} cannot be sampled from, {rows} missing value(s) generated"
            ),
        }
    }
}

/// Result of a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatedData {
    rows: usize,
    names: Vec<String>,
    columns: Vec<Column>,
    warnings: Vec<SimulationWarning>,
}

impl SimulatedData {
    /// Number of rows.
    #[must_use]
    pub const fn nrows(&self) -> usize {
        self.rows
    }

    /// Number of columns, one per node.
    #[must_use]
    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    /// Column names, in network storage order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// All columns, in network storage order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column of a node.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        let i = self.names.iter().position(|n| n == name)?;
        self.columns.get(i)
    }

    /// Column of a discrete node.
    #[must_use]
    pub fn discrete(&self, name: &str) -> Option<&DiscreteColumn> {
        self.column(name)?.as_discrete()
    }

    /// Column of a Gaussian node.
    #[must_use]
    pub fn continuous(&self, name: &str) -> Option<&[f64]> {
        self.column(name)?.as_continuous()
    }

    /// Warnings raised during the run, at most one per node.
    #[must_use]
    pub fn warnings(&self) -> &[SimulationWarning] {
        &self.warnings
    }
}

/// Table under construction. Each slot is written exactly once.
pub(crate) struct PartialTable {
    rows: usize,
    names: Vec<String>,
    slots: Vec<Option<Column>>,
}

impl PartialTable {
    pub(crate) fn allocate(network: &Network, rows: usize) -> Self {
        Self {
            rows,
            names: network.names().map(str::to_string).collect(),
            slots: vec![None; network.len()],
        }
    }

    fn slot(&self, index: usize) -> Result<&Column, ExecutionError> {
        self.slots
            .get(index)
            .and_then(Option::as_ref)
            .ok_or_else(|| ExecutionError::ColumnNotSampled {
                node: self.name(index),
            })
    }

    fn name(&self, index: usize) -> String {
        self.names.get(index).cloned().unwrap_or_default()
    }

    /// Sampled code columns of discrete parents, in parent order.
    pub(crate) fn discrete_parents(
        &self,
        network: &Network,
        node: &Node,
    ) -> Result<Vec<&[Option<u32>]>, ExecutionError> {
        network
            .parent_indices(node)
            .into_iter()
            .map(|i| match self.slot(i)? {
                Column::Discrete(d) => Ok(d.codes()),
                Column::Continuous(_) => Err(ExecutionError::ColumnKindMismatch {
                    node: self.name(i),
                    expected: "discrete",
                }),
            })
            .collect()
    }

    /// Sampled value columns of continuous parents, in parent order.
    pub(crate) fn continuous_parents(
        &self,
        network: &Network,
        node: &Node,
    ) -> Result<Vec<&[f64]>, ExecutionError> {
        network
            .parent_indices(node)
            .into_iter()
            .map(|i| match self.slot(i)? {
                Column::Continuous(v) => Ok(v.as_slice()),
                Column::Discrete(_) => Err(ExecutionError::ColumnKindMismatch {
                    node: self.name(i),
                    expected: "continuous",
                }),
            })
            .collect()
    }

    pub(crate) fn write_discrete(&mut self, index: usize, node: &Node, codes: Vec<Option<u32>>) -> BnResult<()> {
        let (levels, ordinal) = match node.model() {
            NodeModel::Categorical(t) => (t.levels().to_vec(), false),
            NodeModel::Ordinal(t) => (t.levels().to_vec(), true),
            NodeModel::Gaussian(_) => {
                return Err(ExecutionError::ColumnKindMismatch {
                    node: node.name().to_string(),
                    expected: "continuous",
                }
                .into())
            }
        };
        self.write(
            index,
            Column::Discrete(DiscreteColumn {
                levels,
                ordinal,
                codes,
            }),
        )
    }

    pub(crate) fn write_continuous(&mut self, index: usize, values: Vec<f64>) -> BnResult<()> {
        self.write(index, Column::Continuous(values))
    }

    fn write(&mut self, index: usize, column: Column) -> BnResult<()> {
        if column.len() != self.rows {
            return Err(BnError::internal(format!(
                "column of node '{}' has {} rows, expected {}",
                self.name(index),
                column.len(),
                self.rows
            )));
        }
        let name = self.name(index);
        let slot = self
            .slots
            .get_mut(index)
            .ok_or_else(|| BnError::internal(format!("no column slot at index {index}")))?;
        if slot.is_some() {
            return Err(ExecutionError::ColumnAlreadySampled { node: name }.into());
        }
        *slot = Some(column);
        Ok(())
    }

    pub(crate) fn finish(self, warnings: Vec<SimulationWarning>) -> BnResult<SimulatedData> {
        let mut columns = Vec::with_capacity(self.slots.len());
        for (i, slot) in self.slots.into_iter().enumerate() {
            let column = slot.ok_or_else(|| ExecutionError::ColumnNotSampled {
                node: self.names.get(i).cloned().unwrap_or_default(),
            })?;
            columns.push(column);
        }
        Ok(SimulatedData {
            rows: self.rows,
            names: self.names,
            columns,
            warnings,
        })
    }
}
