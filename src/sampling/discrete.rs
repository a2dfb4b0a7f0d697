//! Categorical and ordinal samplers.

use std::collections::HashMap;

use rand::distributions::{Distribution, Uniform, WeightedIndex};
use rand::Rng;

use crate::error::{BnError, BnResult};
use crate::evidence::FixedDraw;
use crate::network::ConditionalTable;

use super::configuration::row_configurations;

/// Codes drawn for one discrete node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DiscreteDraw {
    pub codes: Vec<Option<u32>>,
    /// Rows left missing because their configuration could not be sampled.
    pub degenerate_rows: usize,
}

impl DiscreteDraw {
    fn complete(codes: Vec<Option<u32>>) -> Self {
        Self {
            codes,
            degenerate_rows: 0,
        }
    }
}

/// Categorical distribution over one table slice, or `None` if the slice has a
/// negative or non-finite weight or sums to zero.
///
/// The weighted index keeps its own cumulative copy of the weights; the table
/// is only read.
fn categorical(slice: &[f64]) -> Option<WeightedIndex<f64>> {
    if slice.iter().any(|p| !p.is_finite() || *p < 0.0) {
        return None;
    }
    let total: f64 = slice.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return None;
    }
    WeightedIndex::new(slice).ok()
}

fn draw_code<R: Rng + ?Sized>(dist: &WeightedIndex<f64>, rng: &mut R) -> Option<u32> {
    u32::try_from(dist.sample(rng)).ok()
}

/// Codes for a fixed discrete node: one level everywhere, or a uniform choice
/// per row among a set of levels.
fn fixed_codes<R: Rng + ?Sized>(fixed: &FixedDraw, rows: usize, rng: &mut R) -> BnResult<Vec<Option<u32>>> {
    match fixed {
        FixedDraw::Level(code) => Ok(vec![Some(*code); rows]),
        FixedDraw::Levels(codes) if codes.is_empty() => Err(BnError::internal("empty fixed level set")),
        FixedDraw::Levels(codes) => {
            let pick = Uniform::new(0, codes.len());
            Ok((0..rows).map(|_| Some(codes[pick.sample(rng)])).collect())
        }
        FixedDraw::Constant(_) | FixedDraw::Interval { .. } => {
            Err(BnError::internal("continuous fixed value on a discrete node"))
        }
    }
}

/// Samples a discrete node without parents.
pub(crate) fn sample_root<R: Rng + ?Sized>(
    table: &ConditionalTable,
    rows: usize,
    fixed: Option<&FixedDraw>,
    rng: &mut R,
) -> BnResult<DiscreteDraw> {
    if let Some(fixed) = fixed {
        return fixed_codes(fixed, rows, rng).map(DiscreteDraw::complete);
    }

    let Some(dist) = table.slice(0).and_then(categorical) else {
        return Ok(DiscreteDraw {
            codes: vec![None; rows],
            degenerate_rows: rows,
        });
    };
    let codes = (0..rows).map(|_| draw_code(&dist, rng)).collect();
    Ok(DiscreteDraw::complete(codes))
}

/// Samples a discrete node given its parents' codes, in parent order.
///
/// Rows whose parent configuration has a degenerate slice are left missing and
/// counted; rows with a missing parent value are left missing without being
/// counted. Neither consumes random draws.
pub(crate) fn sample_conditional<R: Rng + ?Sized>(
    table: &ConditionalTable,
    rows: usize,
    parents: &[&[Option<u32>]],
    fixed: Option<&FixedDraw>,
    rng: &mut R,
) -> BnResult<DiscreteDraw> {
    if let Some(fixed) = fixed {
        return fixed_codes(fixed, rows, rng).map(DiscreteDraw::complete);
    }

    let cards = table.parent_cardinalities();
    if parents.len() != cards.len() {
        return Err(BnError::internal(format!(
            "{} parent columns for a table with {} parent dimensions",
            parents.len(),
            cards.len()
        )));
    }

    let configurations = row_configurations(parents, cards, rows);
    let mut slices: HashMap<usize, Option<WeightedIndex<f64>>> = HashMap::new();
    let mut codes = Vec::with_capacity(rows);
    let mut degenerate_rows = 0;
    for configuration in configurations {
        let Some(configuration) = configuration else {
            codes.push(None);
            continue;
        };
        let dist = slices
            .entry(configuration)
            .or_insert_with(|| table.slice(configuration).and_then(categorical));
        match dist {
            Some(dist) => codes.push(draw_code(dist, rng)),
            None => {
                degenerate_rows += 1;
                codes.push(None);
            }
        }
    }

    Ok(DiscreteDraw {
        codes,
        degenerate_rows,
    })
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn labels(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("l{i}")).collect()
    }

    #[test]
    fn categorical_rejects_degenerate_slices() {
        assert!(categorical(&[0.0, 0.0]).is_none());
        assert!(categorical(&[f64::NAN, 1.0]).is_none());
        assert!(categorical(&[f64::INFINITY, 1.0]).is_none());
        assert!(categorical(&[-0.5, 1.5]).is_none());
        assert!(categorical(&[0.0, 1.0]).is_some());
    }

    #[test]
    fn root_frequencies_follow_table() {
        let table = ConditionalTable::marginal(labels(3), vec![0.2, 0.5, 0.3]);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let draw = sample_root(&table, 20_000, None, &mut rng).unwrap();
        assert_eq!(draw.degenerate_rows, 0);

        let mut counts = [0usize; 3];
        for code in draw.codes.iter().flatten() {
            counts[*code as usize] += 1;
        }
        for (count, p) in counts.iter().zip([0.2, 0.5, 0.3]) {
            let freq = *count as f64 / 20_000.0;
            assert!((freq - p).abs() < 0.02, "freq {freq} vs {p}");
        }
    }

    #[test]
    fn table_is_left_untouched() {
        let table = ConditionalTable::marginal(labels(2), vec![0.25, 0.75]);
        let before = table.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let _ = sample_root(&table, 100, None, &mut rng).unwrap();
        assert_eq!(table, before);
    }

    #[test]
    fn fixed_level_set_stays_in_set() {
        let table = ConditionalTable::marginal(labels(4), vec![0.25; 4]);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let fixed = FixedDraw::Levels(vec![1, 3]);
        let draw = sample_root(&table, 500, Some(&fixed), &mut rng).unwrap();
        assert!(draw.codes.iter().all(|c| matches!(c, Some(1 | 3))));
        assert!(draw.codes.contains(&Some(1)));
        assert!(draw.codes.contains(&Some(3)));
    }

    #[test]
    fn conditional_follows_parent_configuration() {
        // B | A: A=0 -> always b0, A=1 -> always b1
        let table = ConditionalTable::new(labels(2), vec![2, 2], vec![1.0, 0.0, 0.0, 1.0]);
        let parent = [Some(0), Some(1), Some(1), Some(0)];
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let draw = sample_conditional(&table, 4, &[&parent[..]], None, &mut rng).unwrap();
        assert_eq!(draw.codes, vec![Some(0), Some(1), Some(1), Some(0)]);
        assert_eq!(draw.degenerate_rows, 0);
    }

    #[test]
    fn degenerate_configuration_yields_missing_rows() {
        let table = ConditionalTable::new(labels(2), vec![2, 2], vec![0.5, 0.5, 0.0, 0.0]);
        let parent = [Some(0), Some(1), None, Some(1), Some(0)];
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let draw = sample_conditional(&table, 5, &[&parent[..]], None, &mut rng).unwrap();
        assert!(draw.codes[0].is_some());
        assert_eq!(draw.codes[1], None);
        assert_eq!(draw.codes[2], None);
        assert_eq!(draw.codes[3], None);
        assert!(draw.codes[4].is_some());
        assert_eq!(draw.degenerate_rows, 2);
    }

    #[test]
    fn fixed_conditional_ignores_parents() {
        let table = ConditionalTable::new(labels(2), vec![2, 2], vec![1.0, 0.0, 1.0, 0.0]);
        let parent = [Some(0), Some(1)];
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let draw =
            sample_conditional(&table, 2, &[&parent[..]], Some(&FixedDraw::Level(1)), &mut rng).unwrap();
        assert_eq!(draw.codes, vec![Some(1), Some(1)]);
    }

    #[test]
    fn continuous_fixed_value_is_internal_error() {
        let table = ConditionalTable::marginal(labels(2), vec![0.5, 0.5]);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let err = sample_root(&table, 2, Some(&FixedDraw::Constant(1.0)), &mut rng).unwrap_err();
        assert!(err.is_internal());
    }
}
