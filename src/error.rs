//! Error types for bnsim.
//!
//! All errors are strongly typed using thiserror. Structural problems with a
//! network or an override abort the whole call; degenerate conditional slices
//! are not errors and surface as [`crate::SimulationWarning`]s instead.

use thiserror::Error;

/// Validation errors raised while building a network or checking inputs.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Duplicate node name '{name}'")]
    DuplicateNode {
        name: String,
    },

    #[error("Node '{node}' lists unknown parent '{parent}'")]
    UnknownParent {
        node: String,
        parent: String,
    },

    #[error("Node '{node}' lists parent '{parent}' more than once")]
    RepeatedParent {
        node: String,
        parent: String,
    },

    #[error("Node '{node}' has no levels")]
    EmptyLevels {
        node: String,
    },

    #[error("Table of node '{node}' has dimensions {actual:?}, expected {expected:?}")]
    TableShapeMismatch {
        node: String,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("Table of node '{node}' with dimensions {dims:?} has too many cells to address")]
    TableTooLarge {
        node: String,
        dims: Vec<usize>,
    },

    #[error("Table of node '{node}' holds {actual} probabilities, its dimensions imply {expected}")]
    TableSizeMismatch {
        node: String,
        expected: usize,
        actual: usize,
    },

    #[error("Node '{node}' has {actual} coefficients, expected {expected}")]
    CoefficientMismatch {
        node: String,
        expected: usize,
        actual: usize,
    },

    #[error("Node '{node}' has invalid residual standard deviation {value}")]
    InvalidResidualSd {
        node: String,
        value: f64,
    },

    #[error("Discrete node '{node}' cannot have continuous parent '{parent}'")]
    DiscreteParentRequired {
        node: String,
        parent: String,
    },

    #[error("Gaussian node '{node}' cannot have discrete parent '{parent}'")]
    ContinuousParentRequired {
        node: String,
        parent: String,
    },

    #[error("Network contains a cycle through {nodes:?}")]
    CyclicGraph {
        nodes: Vec<String>,
    },

    #[error("Depth vector has {actual} entries for {expected} nodes")]
    DepthLengthMismatch {
        expected: usize,
        actual: usize,
    },

    #[error("Invalid fixed value for node '{node}': {reason}")]
    InvalidFixedValue {
        node: String,
        reason: String,
    },

    #[error("Node '{node}' has no level '{level}'")]
    UnknownLevel {
        node: String,
        level: String,
    },

    #[error("Invalid simulation config: {reason}")]
    InvalidConfig {
        reason: String,
    },

    #[error("Malformed network description: {reason}")]
    MalformedNetwork {
        reason: String,
    },
}

/// Execution errors raised while counting or simulating.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("Node not found: {name}")]
    NodeNotFound {
        name: String,
    },

    #[error("Column of node '{node}' was read before it was sampled")]
    ColumnNotSampled {
        node: String,
    },

    #[error("Column of node '{node}' was sampled twice")]
    ColumnAlreadySampled {
        node: String,
    },

    #[error("Column of node '{node}' is not {expected}")]
    ColumnKindMismatch {
        node: String,
        expected: &'static str,
    },
}

/// Top-level error type for bnsim.
#[derive(Debug, Error)]
pub enum BnError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },
}

impl BnError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is an execution error.
    #[must_use]
    pub const fn is_execution(&self) -> bool {
        matches!(self, Self::Execution(_))
    }

    /// Returns true if this is an internal error.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }

    /// Returns true if a requested node does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Execution(ExecutionError::NodeNotFound { .. })
                | Self::Validation(ValidationError::UnknownParent { .. })
        )
    }

    /// Returns true if a table, coefficient vector or depth vector has the wrong shape.
    #[must_use]
    pub const fn is_shape_mismatch(&self) -> bool {
        matches!(
            self,
            Self::Validation(
                ValidationError::TableShapeMismatch { .. }
                    | ValidationError::TableTooLarge { .. }
                    | ValidationError::TableSizeMismatch { .. }
                    | ValidationError::CoefficientMismatch { .. }
                    | ValidationError::DepthLengthMismatch { .. }
            )
        )
    }
}

/// Result type alias for bnsim operations.
pub type BnResult<T> = Result<T, BnError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_table_shape() {
        let err = ValidationError::TableShapeMismatch {
            node: "B".to_string(),
            expected: vec![2, 3],
            actual: vec![2, 2],
        };
        let msg = format!("{err}");
        assert!(msg.contains("'B'"));
        assert!(msg.contains("[2, 3]"));
    }

    #[test]
    fn test_execution_error_node_not_found() {
        let err = ExecutionError::NodeNotFound {
            name: "ghost".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("Node not found"));
        assert!(msg.contains("ghost"));
    }

    #[test]
    fn test_bn_error_from_validation() {
        let err: BnError = ValidationError::CoefficientMismatch {
            node: "X".to_string(),
            expected: 2,
            actual: 3,
        }
        .into();
        assert!(err.is_validation());
        assert!(err.is_shape_mismatch());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_bn_error_from_execution() {
        let err: BnError = ExecutionError::NodeNotFound {
            name: "Z".to_string(),
        }
        .into();
        assert!(err.is_execution());
        assert!(err.is_not_found());
        assert!(!err.is_shape_mismatch());
    }

    #[test]
    fn test_unknown_parent_counts_as_not_found() {
        let err: BnError = ValidationError::UnknownParent {
            node: "B".to_string(),
            parent: "A".to_string(),
        }
        .into();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_bn_error_internal() {
        let err = BnError::internal("unexpected state");
        assert!(err.is_internal());
        let msg = format!("{err}");
        assert!(msg.contains("unexpected state"));
    }
}
