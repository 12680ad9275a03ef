//! Synthetic data.

use crate::error::{Error, Result};
use ndarray::{Array2, ArrayView2};
use rand::prelude::*;
use rand_distr::Normal;

/// Isotropic Gaussian blobs, `n_per_center` samples around each row of
/// `centers`. Returns the samples and the index of the generating center.
pub fn make_blobs(
    centers: ArrayView2<'_, f64>,
    n_per_center: usize,
    std: f64,
    seed: u64,
) -> Result<(Array2<f64>, Vec<usize>)> {
    if centers.nrows() == 0 || n_per_center == 0 {
        return Err(Error::EmptyInput);
    }
    if !(std.is_finite() && std >= 0.0) {
        return Err(Error::InvalidParameter {
            name: "std",
            message: "must be finite and non-negative",
        });
    }
    let noise = Normal::new(0.0, std).map_err(|e| Error::Other(e.to_string()))?;

    let mut rng = StdRng::seed_from_u64(seed);
    let n = centers.nrows() * n_per_center;
    let d = centers.ncols();

    let mut samples = Array2::<f64>::zeros((n, d));
    let mut labels = Vec::with_capacity(n);
    for (k, center) in centers.outer_iter().enumerate() {
        for i in 0..n_per_center {
            let mut row = samples.row_mut(k * n_per_center + i);
            for (v, c) in row.iter_mut().zip(center.iter()) {
                *v = c + noise.sample(&mut rng);
            }
            labels.push(k);
        }
    }

    Ok((samples, labels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_blobs_shape_and_labels() {
        let centers = array![[0.0, 0.0, 0.0], [5.0, 5.0, 5.0]];
        let (x, labels) = make_blobs(centers.view(), 10, 0.1, 1).unwrap();

        assert_eq!(x.dim(), (20, 3));
        assert_eq!(labels.iter().filter(|&&l| l == 1).count(), 10);
        assert!(x.row(15).iter().all(|v| (v - 5.0).abs() < 1.0));
    }

    #[test]
    fn test_blobs_seeded() {
        let centers = array![[1.0, 2.0]];
        let a = make_blobs(centers.view(), 5, 0.5, 9).unwrap();
        let b = make_blobs(centers.view(), 5, 0.5, 9).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_blobs_bad_std() {
        let centers = array![[1.0, 2.0]];
        for std in [-1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                make_blobs(centers.view(), 5, std, 0),
                Err(Error::InvalidParameter { name: "std", .. })
            ));
        }
    }

    #[test]
    fn test_blobs_zero_std_is_exact() {
        let centers = array![[1.0, 2.0], [3.0, 4.0]];
        let (x, _) = make_blobs(centers.view(), 3, 0.0, 5).unwrap();
        assert_eq!(x.row(4).to_vec(), vec![3.0, 4.0]);
    }
}
