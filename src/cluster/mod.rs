//! Clustering models whose decision boundaries can be drawn.
//!
//! A boundary plot needs only a *fitted* clustering: a label per sample and,
//! when the algorithm has them, its centers. [`ClusterModel`] is that
//! capability; [`Clustering`] fits one from data.
//!
//! | Algorithm | Centers | Boundary source |
//! |-----------|---------|-----------------|
//! | [`Kmeans`] | centroids | the model's own rows |
//! | [`Dbscan`] | none | per-label means |
//! | [`LabelAssignment`] | optional | either |
//!
//! ## Usage
//!
//! ```rust
//! use clusterview::cluster::{ClusterModel, Clustering, Kmeans};
//! use ndarray::array;
//!
//! let data = array![[0.0, 0.0], [0.1, 0.1], [10.0, 10.0], [10.1, 10.1]];
//!
//! let model = Kmeans::new(2).with_seed(1).fit(data.view()).unwrap();
//! assert_eq!(model.labels()[0], model.labels()[1]);
//! assert_ne!(model.labels()[0], model.labels()[2]);
//! assert!(model.cluster_centers().is_some());
//! ```

mod assignment;
mod dbscan;
mod kmeans;
mod traits;

pub use assignment::LabelAssignment;
pub use dbscan::{Dbscan, DbscanModel, NOISE};
pub use kmeans::{Kmeans, KmeansModel};
pub use traits::{ClusterModel, Clustering};
