//! Parent configurations of discrete tables.
//!
//! A configuration is the mixed-radix number whose digits are the parents'
//! level codes, first parent least significant. This matches the column-major
//! layout of [`crate::ConditionalTable`].

/// Flattened configuration index for one combination of parent codes.
///
/// Returns `None` if the slices differ in length or a code is out of range.
///
/// # Examples
///
/// ```
/// use bnsim::configuration_index;
///
/// // parents with 2 and 3 levels: (1, 2) -> 1 + 2 * 2
/// assert_eq!(configuration_index(&[1, 2], &[2, 3]), Some(5));
/// assert_eq!(configuration_index(&[], &[]), Some(0));
/// ```
#[must_use]
pub fn configuration_index(codes: &[u32], cardinalities: &[usize]) -> Option<usize> {
    if codes.len() != cardinalities.len() {
        return None;
    }
    let mut index = 0usize;
    let mut stride = 1usize;
    for (&code, &card) in codes.iter().zip(cardinalities) {
        let code = code as usize;
        if code >= card {
            return None;
        }
        index = index.checked_add(code.checked_mul(stride)?)?;
        stride = stride.checked_mul(card)?;
    }
    Some(index)
}

/// Configuration of every row; `None` where a parent value is missing.
pub(crate) fn row_configurations(
    parents: &[&[Option<u32>]],
    cardinalities: &[usize],
    rows: usize,
) -> Vec<Option<usize>> {
    let mut codes = vec![0u32; parents.len()];
    (0..rows)
        .map(|row| {
            for (slot, column) in codes.iter_mut().zip(parents) {
                *slot = (*column.get(row)?)?;
            }
            configuration_index(&codes, cardinalities)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_parent_varies_fastest() {
        let cards = [2, 3, 2];
        let mut expected = 0;
        for c in 0..2u32 {
            for b in 0..3u32 {
                for a in 0..2u32 {
                    assert_eq!(configuration_index(&[a, b, c], &cards), Some(expected));
                    expected += 1;
                }
            }
        }
    }

    #[test]
    fn rejects_out_of_range_codes() {
        assert_eq!(configuration_index(&[2], &[2]), None);
        assert_eq!(configuration_index(&[0, 0], &[2]), None);
    }

    #[test]
    fn rows_with_missing_parents_have_no_configuration() {
        let a = [Some(0), Some(1), None, Some(1)];
        let b = [Some(2), Some(0), Some(1), None];
        let configs = row_configurations(&[&a[..], &b[..]], &[2, 3], 4);
        assert_eq!(configs, vec![Some(4), Some(1), None, None]);
    }

    #[test]
    fn no_parents_means_single_configuration() {
        assert_eq!(row_configurations(&[], &[], 3), vec![Some(0); 3]);
    }
}
