//! Fixed-value overrides ("evidence") for simulation.
//!
//! A fixed node is not drawn from its own distribution: discrete nodes are
//! clamped to one level or drawn uniformly from a set of levels, Gaussian nodes
//! are clamped to a constant or drawn uniformly from an interval.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{BnResult, ExecutionError, ValidationError};
use crate::network::{ConditionalTable, Network, NodeModel};

/// A discrete level, by label or by zero-based code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LevelRef {
    /// Zero-based level code.
    Index(usize),
    /// Level label.
    Label(String),
}

impl fmt::Display for LevelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "#{i}"),
            Self::Label(l) => write!(f, "{l}"),
        }
    }
}

impl From<&str> for LevelRef {
    fn from(label: &str) -> Self {
        Self::Label(label.to_string())
    }
}

impl From<String> for LevelRef {
    fn from(label: String) -> Self {
        Self::Label(label)
    }
}

impl From<usize> for LevelRef {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Override applied to one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FixedValue {
    /// Every row takes this level.
    Level(LevelRef),
    /// Every row is drawn uniformly, with replacement, from these levels.
    Levels(Vec<LevelRef>),
    /// Every row takes this value.
    Constant(f64),
    /// Every row is drawn uniformly from `[lo, hi]`.
    Interval {
        /// Lower bound.
        lo: f64,
        /// Upper bound.
        hi: f64,
    },
}

impl FixedValue {
    /// Clamp to one level.
    pub fn level(level: impl Into<LevelRef>) -> Self {
        Self::Level(level.into())
    }

    /// Uniform choice among levels.
    pub fn levels<I, L>(levels: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<LevelRef>,
    {
        Self::Levels(levels.into_iter().map(Into::into).collect())
    }

    /// Clamp to a constant.
    #[must_use]
    pub const fn constant(value: f64) -> Self {
        Self::Constant(value)
    }

    /// Uniform draw from an interval.
    #[must_use]
    pub const fn interval(lo: f64, hi: f64) -> Self {
        Self::Interval { lo, hi }
    }

    /// Checks the override on its own, without looking at the node.
    pub fn validate(&self, node: &str) -> Result<(), ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidFixedValue {
            node: node.to_string(),
            reason: reason.to_string(),
        };
        match self {
            Self::Level(_) => Ok(()),
            Self::Levels(levels) if levels.is_empty() => Err(invalid("empty level set")),
            Self::Levels(_) => Ok(()),
            Self::Constant(v) if !v.is_finite() => Err(invalid("constant is not finite")),
            Self::Constant(_) => Ok(()),
            Self::Interval { lo, hi } if !(hi - lo).is_finite() => {
                Err(invalid("interval bounds are not finite"))
            }
            // uniform sampling scales the width by 1 / (1 - eps)
            Self::Interval { lo, hi } if !((hi - lo) / (1.0 - f64::EPSILON)).is_finite() => {
                Err(invalid("interval is too wide to sample from"))
            }
            Self::Interval { lo, hi } if lo > hi => Err(invalid("interval lower bound exceeds upper bound")),
            Self::Interval { .. } => Ok(()),
        }
    }
}

/// Fixed values keyed by node name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Evidence {
    fixed: BTreeMap<String, FixedValue>,
}

impl Evidence {
    /// No fixed nodes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixes a node, replacing any earlier override for it.
    #[must_use]
    pub fn fix(mut self, node: impl Into<String>, value: FixedValue) -> Self {
        self.insert(node, value);
        self
    }

    /// Fixes a node in place.
    pub fn insert(&mut self, node: impl Into<String>, value: FixedValue) {
        self.fixed.insert(node.into(), value);
    }

    /// Override for a node, if any.
    #[must_use]
    pub fn get(&self, node: &str) -> Option<&FixedValue> {
        self.fixed.get(node)
    }

    /// Number of fixed nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fixed.len()
    }

    /// Returns true if no node is fixed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fixed.is_empty()
    }

    /// Fixed nodes and their overrides, by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FixedValue)> {
        self.fixed.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Checks every override on its own.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.iter().try_for_each(|(node, value)| value.validate(node))
    }

    /// Matches the overrides against the network, aligned to storage index.
    pub(crate) fn resolve(&self, network: &Network) -> BnResult<Vec<Option<FixedDraw>>> {
        let mut resolved = vec![None; network.len()];
        for (name, value) in self.iter() {
            let index = network.index_of(name).ok_or_else(|| ExecutionError::NodeNotFound {
                name: name.to_string(),
            })?;
            value.validate(name)?;
            let node = &network.nodes()[index];
            resolved[index] = Some(FixedDraw::resolve(name, node.model(), value)?);
        }
        Ok(resolved)
    }
}

/// An override checked against its node, with levels turned into codes.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FixedDraw {
    Level(u32),
    Levels(Vec<u32>),
    Constant(f64),
    Interval { lo: f64, hi: f64 },
}

impl FixedDraw {
    fn resolve(node: &str, model: &NodeModel, value: &FixedValue) -> Result<Self, ValidationError> {
        let mismatch = |expected: &str| ValidationError::InvalidFixedValue {
            node: node.to_string(),
            reason: format!("{} node needs {expected}", model.kind()),
        };
        match (model, value) {
            (NodeModel::Categorical(table) | NodeModel::Ordinal(table), FixedValue::Level(level)) => {
                Ok(Self::Level(level_code(node, table, level)?))
            }
            (NodeModel::Categorical(table) | NodeModel::Ordinal(table), FixedValue::Levels(levels)) => {
                let codes = levels
                    .iter()
                    .map(|level| level_code(node, table, level))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self::Levels(codes))
            }
            (NodeModel::Categorical(_) | NodeModel::Ordinal(_), _) => Err(mismatch("a level or a set of levels")),
            (NodeModel::Gaussian(_), FixedValue::Constant(v)) => Ok(Self::Constant(*v)),
            (NodeModel::Gaussian(_), FixedValue::Interval { lo, hi }) => Ok(Self::Interval { lo: *lo, hi: *hi }),
            (NodeModel::Gaussian(_), _) => Err(mismatch("a constant or an interval")),
        }
    }
}

fn level_code(node: &str, table: &ConditionalTable, level: &LevelRef) -> Result<u32, ValidationError> {
    let code = match level {
        LevelRef::Label(label) => table.level_index(label),
        LevelRef::Index(i) => (*i < table.cardinality()).then_some(*i),
    };
    code.and_then(|c| u32::try_from(c).ok())
        .ok_or_else(|| ValidationError::UnknownLevel {
            node: node.to_string(),
            level: level.to_string(),
        })
}
