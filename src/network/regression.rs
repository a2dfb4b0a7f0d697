//! Linear-Gaussian local distributions.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Linear regression on the parents with Gaussian residuals.
///
/// `coefficients[0]` is the intercept; `coefficients[j]` multiplies the
/// `j`-th parent in the node's parent order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearGaussian {
    coefficients: Vec<f64>,
    residual_sd: f64,
}

impl LinearGaussian {
    /// Creates regression parameters.
    #[must_use]
    pub fn new(coefficients: Vec<f64>, residual_sd: f64) -> Self {
        Self {
            coefficients,
            residual_sd,
        }
    }

    /// Intercept-only model for a root node.
    #[must_use]
    pub fn root(mean: f64, residual_sd: f64) -> Self {
        Self::new(vec![mean], residual_sd)
    }

    /// All coefficients, intercept first.
    #[must_use]
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// The intercept.
    #[must_use]
    pub fn intercept(&self) -> f64 {
        self.coefficients.first().copied().unwrap_or(0.0)
    }

    /// Coefficients of the parents, in parent order.
    #[must_use]
    pub fn parent_coefficients(&self) -> &[f64] {
        self.coefficients.get(1..).unwrap_or(&[])
    }

    /// Standard deviation of the residuals.
    #[must_use]
    pub const fn residual_sd(&self) -> f64 {
        self.residual_sd
    }

    pub(crate) fn validate(&self, node: &str, parents: usize) -> Result<(), ValidationError> {
        if self.coefficients.len() != parents + 1 {
            return Err(ValidationError::CoefficientMismatch {
                node: node.to_string(),
                expected: parents + 1,
                actual: self.coefficients.len(),
            });
        }
        if !self.residual_sd.is_finite() || self.residual_sd < 0.0 {
            return Err(ValidationError::InvalidResidualSd {
                node: node.to_string(),
                value: self.residual_sd,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coefficient_views() {
        let g = LinearGaussian::new(vec![1.5, -2.0, 0.5], 1.0);
        assert_eq!(g.intercept(), 1.5);
        assert_eq!(g.parent_coefficients(), &[-2.0, 0.5]);
        assert!(g.validate("X", 2).is_ok());
    }

    #[test]
    fn rejects_coefficient_count() {
        let g = LinearGaussian::new(vec![1.0, 2.0], 1.0);
        assert!(matches!(
            g.validate("X", 2),
            Err(ValidationError::CoefficientMismatch {
                expected: 3,
                actual: 2,
                ..
            })
        ));
    }

    #[test]
    fn rejects_bad_residual_sd() {
        assert!(LinearGaussian::root(0.0, -1.0).validate("X", 0).is_err());
        assert!(LinearGaussian::root(0.0, f64::NAN).validate("X", 0).is_err());
        assert!(LinearGaussian::root(0.0, 0.0).validate("X", 0).is_ok());
    }
}
