//! DBSCAN: Density-Based Spatial Clustering of Applications with Noise.
//!
//! # The Algorithm (Ester et al., 1996)
//!
//! DBSCAN groups points based on neighborhood density. Unlike k-means, it:
//!
//! - Discovers clusters of arbitrary shape
//! - Automatically determines the number of clusters
//! - Identifies noise points (outliers)
//!
//! ## Core Concepts
//!
//! - **Epsilon (ε)**: Maximum distance between two points to be neighbors.
//! - **MinPts**: Minimum neighbors within ε (the point included) for a point to be "core".
//! - **Noise point**: Neither core nor within ε of a core point.
//!
//! DBSCAN has no notion of a center. A [`DbscanModel`] therefore exposes
//! labels only, and plots fall back to per-label means. Noise points keep the
//! [`NOISE`] label, which sorts after every real cluster id.
//!
//! ## References
//!
//! Ester et al. (1996). "A Density-Based Algorithm for Discovering Clusters
//! in Large Spatial Databases with Noise." KDD-96.

use super::traits::{ClusterModel, Clustering};
use crate::error::{Error, Result};
use ndarray::{ArrayView1, ArrayView2};
use std::collections::HashSet;

/// Label given to noise points.
pub const NOISE: usize = usize::MAX;

/// DBSCAN clustering algorithm.
#[derive(Debug, Clone)]
pub struct Dbscan {
    /// Epsilon: maximum distance for neighborhood.
    epsilon: f64,
    /// Minimum points for core point classification.
    min_pts: usize,
}

/// Labels produced by [`Dbscan`].
#[derive(Debug, Clone, PartialEq)]
pub struct DbscanModel {
    labels: Vec<usize>,
}

impl DbscanModel {
    /// Indices of points labelled [`NOISE`].
    pub fn noise_indices(&self) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, &l)| l == NOISE)
            .map(|(i, _)| i)
            .collect()
    }

    /// Labels with noise as `None`.
    pub fn labels_with_noise(&self) -> Vec<Option<usize>> {
        self.labels
            .iter()
            .map(|&l| if l == NOISE { None } else { Some(l) })
            .collect()
    }
}

impl ClusterModel for DbscanModel {
    fn labels(&self) -> &[usize] {
        &self.labels
    }
}

impl Dbscan {
    /// Create a new DBSCAN clusterer.
    ///
    /// # Arguments
    ///
    /// * `epsilon` - Maximum distance between two points to be neighbors.
    /// * `min_pts` - Minimum number of points to form a dense region.
    pub fn new(epsilon: f64, min_pts: usize) -> Self {
        Self { epsilon, min_pts }
    }

    /// Set epsilon (neighborhood radius).
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set minimum points for core classification.
    pub fn with_min_pts(mut self, min_pts: usize) -> Self {
        self.min_pts = min_pts;
        self
    }

    #[inline]
    fn distance(a: &ArrayView1<'_, f64>, b: &ArrayView1<'_, f64>) -> f64 {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y).powi(2))
            .sum::<f64>()
            .sqrt()
    }

    /// Find all neighbors within epsilon.
    fn region_query(&self, data: &ArrayView2<'_, f64>, point_idx: usize) -> Vec<usize> {
        let point = data.row(point_idx);
        data.outer_iter()
            .enumerate()
            .filter(|(idx, other)| *idx != point_idx && Self::distance(&point, other) <= self.epsilon)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Expand cluster from a core point.
    fn expand_cluster(
        &self,
        data: &ArrayView2<'_, f64>,
        point_idx: usize,
        neighbors: &[usize],
        labels: &mut [usize],
        cluster_id: usize,
        visited: &mut HashSet<usize>,
    ) {
        labels[point_idx] = cluster_id;

        // Iterative expansion (avoid deep recursion)
        let mut to_process: Vec<usize> = neighbors.to_vec();

        while let Some(neighbor_idx) = to_process.pop() {
            // Border points reached from a core point join the cluster
            if labels[neighbor_idx] == NOISE {
                labels[neighbor_idx] = cluster_id;
            }
            if !visited.insert(neighbor_idx) {
                continue;
            }

            let neighbor_neighbors = self.region_query(data, neighbor_idx);
            if neighbor_neighbors.len() + 1 >= self.min_pts {
                for nn in neighbor_neighbors {
                    if !visited.contains(&nn) || labels[nn] == NOISE {
                        to_process.push(nn);
                    }
                }
            }
        }
    }
}

impl Default for Dbscan {
    fn default() -> Self {
        Self::new(0.5, 5)
    }
}

impl Clustering for Dbscan {
    type Model = DbscanModel;

    fn fit(&self, data: ArrayView2<'_, f64>) -> Result<DbscanModel> {
        let n = data.nrows();
        if n == 0 {
            return Err(Error::EmptyInput);
        }

        if self.epsilon <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "epsilon",
                message: "must be positive",
            });
        }

        if self.min_pts == 0 {
            return Err(Error::InvalidParameter {
                name: "min_pts",
                message: "must be at least 1",
            });
        }

        let mut labels = vec![NOISE; n];
        let mut visited = HashSet::with_capacity(n);
        let mut cluster_id = 0;

        for point_idx in 0..n {
            if !visited.insert(point_idx) {
                continue;
            }

            let neighbors = self.region_query(&data, point_idx);

            // MinPts includes the point itself
            if neighbors.len() + 1 < self.min_pts {
                continue;
            }

            self.expand_cluster(
                &data,
                point_idx,
                &neighbors,
                &mut labels,
                cluster_id,
                &mut visited,
            );
            cluster_id += 1;
        }

        Ok(DbscanModel { labels })
    }
}
