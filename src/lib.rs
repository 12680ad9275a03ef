//! # clusterview
//!
//! Decision boundaries of clustering models, drawn in a 2D projection.
//!
//! A fitted clustering (bare, or at the end of a preprocessing [`Pipeline`])
//! is projected into the plane with a [`Reducer`] fit once on the samples.
//! The plane is then shaded by nearest cluster center, which shows the
//! Voronoi-like regions the model implies, and the samples and centers are
//! drawn on top.
//!
//! ```rust
//! use clusterview::cluster::{Clustering, Dbscan};
//! use clusterview::datasets::make_blobs;
//! use clusterview::{plot_decision_boundary, CenterSource, ModelRef, ReducerChoice};
//! use ndarray::array;
//!
//! let (x, _) = make_blobs(array![[0.0, 0.0, 0.0], [8.0, 8.0, 8.0]].view(), 20, 0.3, 7).unwrap();
//! let model = Dbscan::new(1.5, 3).fit(x.view()).unwrap();
//!
//! // DBSCAN has no centers: per-label means are used instead.
//! let plot = plot_decision_boundary(x.view(), ModelRef::Bare(&model), ReducerChoice::default()).unwrap();
//! assert_eq!(plot.center_source(), CenterSource::Computed);
//! ```

pub mod centers;
pub mod cluster;
pub mod datasets;
/// Error types used across `clusterview`.
pub mod error;
pub mod pipeline;
pub mod plot;
pub mod reduce;


pub use centers::{compute_centers, distinct_labels};
pub use cluster::{ClusterModel, Clustering, Dbscan, Kmeans, LabelAssignment};
pub use error::{Error, Result};
pub use pipeline::{ModelRef, Pipeline, Stage, StandardScaler, Transform};
pub use plot::{
    plot_decision_boundary, plot_decision_boundary_with, CenterSource, DecisionPlot, PlotConfig,
    ViewBounds,
};
pub use reduce::{PcaReducer, Reducer, ReducerChoice, ReducerKind};
