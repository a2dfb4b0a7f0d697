//! Linear-Gaussian sampler.

use rand::distributions::{Distribution, Uniform};
use rand::Rng;
use rand_distr::StandardNormal;

use crate::error::{BnError, BnResult};
use crate::evidence::FixedDraw;
use crate::network::LinearGaussian;

/// Samples a Gaussian node given its parents' values, in parent order.
///
/// Noise is drawn for every row first, then the parent terms are added, so a
/// node consumes exactly one normal draw per row.
pub(crate) fn sample<R: Rng + ?Sized>(
    model: &LinearGaussian,
    rows: usize,
    parents: &[&[f64]],
    fixed: Option<&FixedDraw>,
    rng: &mut R,
) -> BnResult<Vec<f64>> {
    match fixed {
        None => {}
        Some(FixedDraw::Constant(value)) => return Ok(vec![*value; rows]),
        Some(FixedDraw::Interval { lo, hi }) => {
            if rows == 0 {
                return Ok(Vec::new());
            }
            let range = Uniform::new_inclusive(*lo, *hi);
            return Ok((0..rows).map(|_| range.sample(rng)).collect());
        }
        Some(FixedDraw::Level(_) | FixedDraw::Levels(_)) => {
            return Err(BnError::internal("discrete fixed value on a Gaussian node"));
        }
    }

    let betas = model.parent_coefficients();
    if betas.len() != parents.len() {
        return Err(BnError::internal(format!(
            "{} parent columns for {} regression coefficients",
            parents.len(),
            betas.len()
        )));
    }

    let intercept = model.intercept();
    let sd = model.residual_sd();
    let mut values: Vec<f64> = (0..rows)
        .map(|_| {
            let z: f64 = StandardNormal.sample(rng);
            intercept + z * sd
        })
        .collect();

    for (column, beta) in parents.iter().zip(betas) {
        for (value, x) in values.iter_mut().zip(column.iter()) {
            *value += x * beta;
        }
    }

    Ok(values)
}
