//! Clustering traits.

use crate::centers::distinct_labels;
use crate::error::Result;
use ndarray::ArrayView2;

/// A fitted clustering: one label per sample, and optionally its own centers.
pub trait ClusterModel {
    /// Cluster label of every sample the model was fit on.
    fn labels(&self) -> &[usize];

    /// Centers stored by the model, one row per cluster.
    ///
    /// Row order is the model's own and need not follow ascending label
    /// order. Models that only produce labels return `None`.
    fn cluster_centers(&self) -> Option<ArrayView2<'_, f64>> {
        None
    }

    /// Number of distinct labels.
    fn n_clusters(&self) -> usize {
        distinct_labels(self.labels()).len()
    }
}

/// Trait for clustering algorithms.
pub trait Clustering {
    /// Fitted model produced by [`Clustering::fit`].
    type Model: ClusterModel;

    /// Fit the algorithm to `data` (rows are samples).
    fn fit(&self, data: ArrayView2<'_, f64>) -> Result<Self::Model>;

    /// Fit the model to data and return cluster assignments.
    ///
    /// Returns a vector of cluster labels, one per input point.
    fn fit_predict(&self, data: ArrayView2<'_, f64>) -> Result<Vec<usize>> {
        Ok(self.fit(data)?.labels().to_vec())
    }
}
