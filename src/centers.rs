//! Cluster centers from a label assignment.
//!
//! Some clustering models (k-means, GMM) carry explicit centers; others
//! (DBSCAN, agglomerative) only produce labels. For the latter the center of
//! a cluster is the arithmetic mean of its members:
//!
//! ```text
//! μ_k = (1 / |C_k|) Σ_{i ∈ C_k} x_i
//! ```
//!
//! Rows are ordered by ascending label value, so row `i` belongs to the
//! `i`-th smallest distinct label. Labels need not be contiguous.

use crate::error::{Error, Result};
use ndarray::{Array2, ArrayView2};
use std::collections::{BTreeMap, BTreeSet};

/// Distinct label values in ascending order.
pub fn distinct_labels(labels: &[usize]) -> Vec<usize> {
    labels
        .iter()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Per-cluster mean vectors, one row per distinct label (ascending).
///
/// # Errors
///
/// - [`Error::EmptyInput`] if `labels` is empty.
/// - [`Error::ShapeMismatch`] if `labels.len() != samples.nrows()`.
///
/// # Example
///
/// ```rust
/// use clusterview::compute_centers;
/// use ndarray::array;
///
/// let x = array![[0.0, 0.0], [2.0, 2.0], [10.0, 10.0]];
/// let centers = compute_centers(&[7, 7, 3], x.view()).unwrap();
///
/// // label 3 sorts first
/// assert_eq!(centers.row(0).to_vec(), vec![10.0, 10.0]);
/// assert_eq!(centers.row(1).to_vec(), vec![1.0, 1.0]);
/// ```
pub fn compute_centers(labels: &[usize], samples: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
    if labels.is_empty() {
        return Err(Error::EmptyInput);
    }
    if labels.len() != samples.nrows() {
        return Err(Error::ShapeMismatch {
            expected: format!("{} labels", samples.nrows()),
            actual: format!("{} labels", labels.len()),
        });
    }

    let d = samples.ncols();

    // label -> (row index in output, member count)
    let mut slots: BTreeMap<usize, (usize, usize)> = BTreeMap::new();
    for &label in labels {
        slots.entry(label).or_insert((0, 0)).1 += 1;
    }
    for (row, slot) in slots.values_mut().enumerate() {
        slot.0 = row;
    }

    let mut centers = Array2::<f64>::zeros((slots.len(), d));
    for (i, &label) in labels.iter().enumerate() {
        let row = slots[&label].0;
        let mut target = centers.row_mut(row);
        target += &samples.row(i);
    }
    for &(row, count) in slots.values() {
        centers.row_mut(row).mapv_inplace(|v| v / count as f64);
    }

    Ok(centers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use proptest::prelude::*;

    #[test]
    fn test_two_blobs() {
        let x = array![
            [0.1, -0.1],
            [-0.1, 0.0],
            [0.0, 0.1],
            [10.1, 9.9],
            [9.9, 10.0],
            [10.0, 10.1],
        ];
        let labels = [0, 0, 0, 1, 1, 1];

        let centers = compute_centers(&labels, x.view()).unwrap();

        assert_eq!(centers.dim(), (2, 2));
        assert!(centers[[0, 0]].abs() < 0.1);
        assert!(centers[[0, 1]].abs() < 0.1);
        assert!((centers[[1, 0]] - 10.0).abs() < 0.1);
        assert!((centers[[1, 1]] - 10.0).abs() < 0.1);
    }

    #[test]
    fn test_gapped_unsorted_labels() {
        let x = array![[1.0], [5.0], [3.0], [9.0]];
        let labels = [40, 2, 40, 17];

        let centers = compute_centers(&labels, x.view()).unwrap();

        // 2 -> 5.0, 17 -> 9.0, 40 -> (1 + 3) / 2
        assert_eq!(centers.column(0).to_vec(), vec![5.0, 9.0, 2.0]);
    }

    #[test]
    fn test_length_mismatch() {
        let x = array![[0.0, 0.0], [1.0, 1.0]];
        let result = compute_centers(&[0, 1, 1], x.view());
        assert!(matches!(result, Err(Error::ShapeMismatch { .. })));
    }

    #[test]
    fn test_empty_labels() {
        let x = Array2::<f64>::zeros((0, 3));
        assert_eq!(compute_centers(&[], x.view()), Err(Error::EmptyInput));
    }

    #[test]
    fn test_distinct_labels_sorted() {
        assert_eq!(distinct_labels(&[3, 1, 3, 0, usize::MAX, 1]), vec![0, 1, 3, usize::MAX]);
    }

    proptest! {
        #[test]
        fn centers_row_count_matches_distinct_labels(
            labels in proptest::collection::vec(0usize..12, 1..60),
            d in 1usize..5,
        ) {
            let n = labels.len();
            let x = Array2::from_shape_fn((n, d), |(i, j)| (i * 7 + j * 3) as f64 * 0.5);

            let centers = compute_centers(&labels, x.view()).unwrap();

            prop_assert_eq!(centers.nrows(), distinct_labels(&labels).len());
            prop_assert_eq!(centers.ncols(), d);
        }

        #[test]
        fn centers_row_is_group_mean(
            labels in proptest::collection::vec(0usize..6, 1..40),
        ) {
            let n = labels.len();
            let x = Array2::from_shape_fn((n, 2), |(i, j)| if j == 0 { i as f64 } else { -(i as f64) * 2.0 });

            let centers = compute_centers(&labels, x.view()).unwrap();

            for (row, label) in distinct_labels(&labels).into_iter().enumerate() {
                let members: Vec<usize> = (0..n).filter(|&i| labels[i] == label).collect();
                let mean_x = members.iter().map(|&i| x[[i, 0]]).sum::<f64>() / members.len() as f64;
                let mean_y = members.iter().map(|&i| x[[i, 1]]).sum::<f64>() / members.len() as f64;
                prop_assert!((centers[[row, 0]] - mean_x).abs() < 1e-9);
                prop_assert!((centers[[row, 1]] - mean_y).abs() < 1e-9);
            }
        }
    }
}
