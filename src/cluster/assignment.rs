use super::traits::ClusterModel;
use ndarray::{Array2, ArrayView2};

/// Labels produced outside this crate, optionally with the producer's centers.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelAssignment {
    labels: Vec<usize>,
    centers: Option<Array2<f64>>,
}

impl LabelAssignment {
    pub fn new(labels: Vec<usize>) -> Self {
        Self {
            labels,
            centers: None,
        }
    }

    /// Attach centers, in whatever row order the producer uses.
    pub fn with_centers(mut self, centers: Array2<f64>) -> Self {
        self.centers = Some(centers);
        self
    }
}

impl ClusterModel for LabelAssignment {
    fn labels(&self) -> &[usize] {
        &self.labels
    }

    fn cluster_centers(&self) -> Option<ArrayView2<'_, f64>> {
        self.centers.as_ref().map(|c| c.view())
    }
}
