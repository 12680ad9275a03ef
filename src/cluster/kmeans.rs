//! K-means clustering.
//!
//! Partitions data into k clusters by minimizing **within-cluster sum of squares**
//! (WCSS):
//!
//! ```text
//! WCSS = Σₖ Σᵢ∈Cₖ ||xᵢ - μₖ||²
//! ```
//!
//! # Lloyd's Algorithm
//!
//! 1. Initialize k centroids via k-means++
//! 2. **Assign**: Each point → nearest centroid
//! 3. **Update**: Each centroid → mean of assigned points
//! 4. Repeat until the centroid shift drops below `tol`
//!
//! The fitted [`KmeansModel`] keeps its centroids, so a decision-boundary plot
//! uses them directly instead of recomputing means from the labels. Centroid
//! row `k` belongs to label `k`.
//!
//! ## K-means++ Initialization
//!
//! 1. Choose first centroid uniformly at random
//! 2. Choose next centroid with probability proportional to D(x)²
//!    (squared distance to nearest existing centroid)

use super::traits::{ClusterModel, Clustering};
use crate::error::{Error, Result};
use ndarray::{Array2, ArrayView1, ArrayView2};
use rand::prelude::*;
use tracing::trace;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// K-means clustering algorithm.
#[derive(Debug, Clone)]
pub struct Kmeans {
    /// Number of clusters.
    k: usize,
    /// Maximum iterations.
    max_iter: usize,
    /// Convergence tolerance.
    tol: f64,
    /// Random seed.
    seed: Option<u64>,
}

/// Result of fitting [`Kmeans`].
#[derive(Debug, Clone)]
pub struct KmeansModel {
    labels: Vec<usize>,
    centroids: Array2<f64>,
    n_iter: usize,
}

impl KmeansModel {
    /// Final centroids, row `k` for label `k`.
    pub fn centroids(&self) -> &Array2<f64> {
        &self.centroids
    }

    /// Number of Lloyd iterations run.
    pub fn n_iter(&self) -> usize {
        self.n_iter
    }

    /// Within-cluster sum of squares for `data` under the fitted labels.
    pub fn inertia(&self, data: ArrayView2<'_, f64>) -> f64 {
        self.labels
            .iter()
            .enumerate()
            .map(|(i, &k)| Kmeans::squared_distance(&data.row(i), &self.centroids.row(k)))
            .sum()
    }
}

impl ClusterModel for KmeansModel {
    fn labels(&self) -> &[usize] {
        &self.labels
    }

    fn cluster_centers(&self) -> Option<ArrayView2<'_, f64>> {
        Some(self.centroids.view())
    }
}

impl Kmeans {
    /// Create a new K-means clusterer.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: 100,
            tol: 1e-4,
            seed: None,
        }
    }

    /// Set maximum iterations.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set convergence tolerance.
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of clusters requested.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Initialize centroids using k-means++ algorithm.
    fn init_centroids(&self, data: &ArrayView2<'_, f64>, rng: &mut impl Rng) -> Array2<f64> {
        let n = data.nrows();
        let d = data.ncols();
        let mut centroids = Array2::zeros((self.k, d));

        // First centroid: random point
        let first = rng.random_range(0..n);
        centroids.row_mut(0).assign(&data.row(first));

        for i in 1..self.k {
            let distances: Vec<f64> = (0..n)
                .map(|j| {
                    let point = data.row(j);
                    (0..i)
                        .map(|c| Self::squared_distance(&point, &centroids.row(c)))
                        .fold(f64::MAX, f64::min)
                })
                .collect();

            // Sample proportional to squared distance
            let total: f64 = distances.iter().sum();
            if total == 0.0 {
                let idx = rng.random_range(0..n);
                centroids.row_mut(i).assign(&data.row(idx));
                continue;
            }

            let threshold = rng.random::<f64>() * total;
            let mut cumsum = 0.0;
            let mut selected = n - 1;

            for (j, &d) in distances.iter().enumerate() {
                cumsum += d;
                if cumsum >= threshold {
                    selected = j;
                    break;
                }
            }

            centroids.row_mut(i).assign(&data.row(selected));
        }

        centroids
    }

    /// Assignment step: every row takes its nearest centroid.
    fn assign(data: &ArrayView2<'_, f64>, centroids: &Array2<f64>, labels: &mut [usize]) {
        for (i, label) in labels.iter_mut().enumerate() {
            *label = Self::nearest(&data.row(i), centroids);
        }
    }

    #[cfg(feature = "parallel")]
    fn assign_parallel(data: &ArrayView2<'_, f64>, centroids: &Array2<f64>, labels: &mut [usize]) {
        labels.par_iter_mut().enumerate().for_each(|(i, label)| {
            *label = Self::nearest(&data.row(i), centroids);
        });
    }

    /// Index of the closest centroid to `point`.
    fn nearest(point: &ArrayView1<'_, f64>, centroids: &Array2<f64>) -> usize {
        let mut best_cluster = 0;
        let mut best_dist = f64::MAX;
        for (k, centroid) in centroids.outer_iter().enumerate() {
            let dist = Self::squared_distance(point, &centroid);
            if dist < best_dist {
                best_dist = dist;
                best_cluster = k;
            }
        }
        best_cluster
    }

    /// Compute squared Euclidean distance.
    fn squared_distance(a: &ArrayView1<'_, f64>, b: &ArrayView1<'_, f64>) -> f64 {
        a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
    }
}

impl Clustering for Kmeans {
    type Model = KmeansModel;

    fn fit(&self, data: ArrayView2<'_, f64>) -> Result<KmeansModel> {
        let n = data.nrows();
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        if self.k == 0 {
            return Err(Error::InvalidParameter {
                name: "k",
                message: "must be at least 1",
            });
        }
        if self.k > n {
            return Err(Error::InvalidClusterCount {
                requested: self.k,
                n_items: n,
            });
        }

        let d = data.ncols();

        let mut rng: Box<dyn RngCore> = match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        };

        let mut centroids = self.init_centroids(&data, &mut rng);
        let mut labels = vec![0usize; n];
        let mut n_iter = 0;

        for iter in 0..self.max_iter {
            n_iter = iter + 1;

            #[cfg(feature = "parallel")]
            Self::assign_parallel(&data, &centroids, &mut labels);

            #[cfg(not(feature = "parallel"))]
            Self::assign(&data, &centroids, &mut labels);

            // Update step
            let mut new_centroids = Array2::<f64>::zeros((self.k, d));
            let mut counts = vec![0usize; self.k];

            for (i, &k) in labels.iter().enumerate() {
                let mut row = new_centroids.row_mut(k);
                row += &data.row(i);
                counts[k] += 1;
            }

            for (k, &count) in counts.iter().enumerate() {
                if count > 0 {
                    new_centroids
                        .row_mut(k)
                        .mapv_inplace(|v| v / count as f64);
                } else {
                    // Empty cluster: reinitialize randomly
                    let idx = rng.random_range(0..n);
                    new_centroids.row_mut(k).assign(&data.row(idx));
                }
            }

            let shift: f64 = centroids
                .iter()
                .zip(new_centroids.iter())
                .map(|(a, b)| (a - b).powi(2))
                .sum();

            centroids = new_centroids;
            trace!(iter, shift, "kmeans update");

            if shift < self.tol {
                break;
            }
        }

        // Labels must agree with the centroids that are handed out.
        Self::assign(&data, &centroids, &mut labels);

        Ok(KmeansModel {
            labels,
            centroids,
            n_iter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn four_points() -> Array2<f64> {
        array![[0.0, 0.0], [0.1, 0.1], [10.0, 10.0], [10.1, 10.1]]
    }

    #[test]
    fn test_kmeans_basic() {
        let data = four_points();

        let kmeans = Kmeans::new(2).with_seed(42);
        let labels = kmeans.fit_predict(data.view()).unwrap();

        // Points 0,1 should be in same cluster, points 2,3 in another
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[2], labels[3]);
        assert_ne!(labels[0], labels[2]);
    }

    #[test]
    fn test_kmeans_centroids_match_labels() {
        let data = four_points();
        let model = Kmeans::new(2).with_seed(7).fit(data.view()).unwrap();

        let c = model.cluster_centers().unwrap();
        assert_eq!(c.dim(), (2, 2));

        let low = model.labels()[0];
        let high = model.labels()[2];
        assert!((c[[low, 0]] - 0.05).abs() < 1e-9);
        assert!((c[[high, 1]] - 10.05).abs() < 1e-9);
        assert!(model.inertia(data.view()) < 0.1);
    }

    #[test]
    fn test_kmeans_all_points_assigned() {
        // Property: every point must be assigned to exactly one cluster
        let data = Array2::from_shape_fn((50, 2), |(i, j)| {
            if j == 0 {
                i as f64 * 0.1
            } else {
                (i % 5) as f64
            }
        });

        let model = Kmeans::new(5).with_seed(123).fit(data.view()).unwrap();

        assert_eq!(model.labels().len(), 50);
        for &label in model.labels() {
            assert!(label < 5, "label {} out of range", label);
        }
        assert!(model.n_iter() >= 1);
    }

    #[test]
    fn test_kmeans_k_equals_n() {
        let data = array![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];

        let labels = Kmeans::new(3).with_seed(42).fit_predict(data.view()).unwrap();

        let unique: std::collections::HashSet<_> = labels.iter().collect();
        assert_eq!(unique.len(), 3);
    }

    #[test]
    fn test_kmeans_deterministic_with_seed() {
        let data = four_points();

        let labels1 = Kmeans::new(2).with_seed(42).fit_predict(data.view()).unwrap();
        let labels2 = Kmeans::new(2).with_seed(42).fit_predict(data.view()).unwrap();

        assert_eq!(labels1, labels2, "same seed should give same result");
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_assignment_matches_sequential() {
        let data = Array2::from_shape_fn((200, 3), |(i, j)| ((i * 7 + j * 13) % 17) as f64 * 0.5);
        let centroids = array![[0.0, 0.0, 0.0], [4.0, 4.0, 4.0], [8.0, 1.0, 6.0], [2.0, 7.5, 3.0]];

        let mut sequential = vec![0; 200];
        let mut parallel = vec![0; 200];
        Kmeans::assign(&data.view(), &centroids, &mut sequential);
        Kmeans::assign_parallel(&data.view(), &centroids, &mut parallel);
        assert_eq!(parallel, sequential);

        let a = Kmeans::new(4).with_seed(3).fit(data.view()).unwrap();
        let b = Kmeans::new(4).with_seed(3).fit(data.view()).unwrap();
        assert_eq!(a.labels(), b.labels());
        assert_eq!(a.centroids(), b.centroids());
    }

    #[test]
    fn test_kmeans_empty_input_error() {
        let data = Array2::<f64>::zeros((0, 2));
        assert_eq!(Kmeans::new(2).fit(data.view()).err(), Some(Error::EmptyInput));
    }

    #[test]
    fn test_kmeans_k_larger_than_n_error() {
        let data = array![[0.0, 0.0], [1.0, 1.0]];
        let result = Kmeans::new(5).fit(data.view());
        assert!(matches!(result, Err(Error::InvalidClusterCount { .. })));
    }
}
