//! Decision-boundary plots of clustering models.
//!
//! The plot answers "which cluster would claim this point?" for every point
//! of a 2D projection of the data:
//!
//! 1. Resolve the model argument into a [`Stage`] and preprocess the data.
//! 2. Fit the reducer on the data; project samples and centers with that fit.
//! 3. Scatter the centers and the samples, colored from one [`DiscretePalette`].
//! 4. Capture the view bounds of the two scatter layers.
//! 5. Rasterize the view on a regular grid by nearest center
//!    ([`BoundaryGrid`]), and keep the captured bounds as the plot's view.
//! 6. Annotate each center with its index.
//!
//! The result is a [`DecisionPlot`]: every layer is inspectable, and the plot
//! renders through `plotters` onto any drawing area.
//!
//! ```rust
//! use clusterview::cluster::{Clustering, Kmeans};
//! use clusterview::pipeline::ModelRef;
//! use clusterview::plot::plot_decision_boundary;
//! use clusterview::reduce::ReducerChoice;
//! use ndarray::array;
//!
//! let data = array![
//!     [0.0, 0.0, 0.1], [0.2, 0.1, 0.0], [0.1, 0.3, 0.2],
//!     [9.0, 9.5, 9.9], [9.7, 9.1, 9.3], [9.2, 9.8, 9.6],
//! ];
//! let model = Kmeans::new(2).with_seed(0).fit(data.view()).unwrap();
//!
//! let plot = plot_decision_boundary(data.view(), ModelRef::Bare(&model), ReducerChoice::default()).unwrap();
//! assert_eq!(plot.palette().len(), 2);
//! assert_eq!(plot.grid().ids().dim(), (100, 100));
//! ```

mod grid;
mod palette;
mod render;

pub use grid::{BoundaryGrid, CenterIndex, ViewBounds};
pub use palette::{DiscretePalette, SET1};

use crate::centers::{compute_centers, distinct_labels};
use crate::error::{Error, Result};
use crate::pipeline::{ModelRef, Stage};
use crate::reduce::{Reducer, ReducerChoice};
use ndarray::{Array2, ArrayView2};
use tracing::{debug, warn};

/// Layout and styling of a boundary plot.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotConfig {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Grid points along each axis.
    pub grid_resolution: usize,
    /// Autoscale margin as a fraction of the data span.
    pub margin: f64,
    /// Opacity of the sample markers.
    pub sample_alpha: f64,
    /// Opacity of the decision mesh.
    pub background_alpha: f64,
    /// Center marker radius in pixels.
    pub center_marker_size: u32,
    /// Sample marker radius in pixels.
    pub sample_marker_size: u32,
    /// Font size of the center index labels.
    pub annotation_font_size: u32,
    /// Chart caption; none by default.
    pub title: Option<String>,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 1600,
            height: 1200,
            grid_resolution: 100,
            margin: 0.05,
            sample_alpha: 0.95,
            background_alpha: 0.25,
            center_marker_size: 14,
            sample_marker_size: 4,
            annotation_font_size: 28,
            title: None,
        }
    }
}

impl PlotConfig {
    /// Defaults: 1600×1200 canvas, 100×100 grid, 5% margin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set canvas size in pixels.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set grid points along each axis.
    pub fn with_grid_resolution(mut self, n: usize) -> Self {
        self.grid_resolution = n;
        self
    }

    /// Set autoscale margin (fraction of span).
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Set background mesh opacity.
    pub fn with_background_alpha(mut self, alpha: f64) -> Self {
        self.background_alpha = alpha;
        self
    }

    /// Set sample marker opacity.
    pub fn with_sample_alpha(mut self, alpha: f64) -> Self {
        self.sample_alpha = alpha;
        self
    }

    /// Set chart caption.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    fn validate(&self) -> Result<()> {
        if self.grid_resolution < 2 {
            return Err(Error::InvalidParameter {
                name: "grid_resolution",
                message: "must be at least 2",
            });
        }
        if !(0.0..=1.0).contains(&self.sample_alpha) || !(0.0..=1.0).contains(&self.background_alpha) {
            return Err(Error::InvalidParameter {
                name: "alpha",
                message: "must be within [0, 1]",
            });
        }
        if !(self.margin >= 0.0 && self.margin.is_finite()) {
            return Err(Error::InvalidParameter {
                name: "margin",
                message: "must be finite and non-negative",
            });
        }
        Ok(())
    }
}

/// Where the plotted centers came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CenterSource {
    /// The model's own centers, in the model's row order.
    Model,
    /// Per-label means, in ascending label order.
    Computed,
}

/// Text placed at a data coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Label text (the center index).
    pub text: String,
    /// Position in reduced coordinates.
    pub at: (f64, f64),
}

/// A fully populated boundary plot.
#[derive(Debug, Clone)]
pub struct DecisionPlot {
    reduced_samples: Array2<f64>,
    reduced_centers: Array2<f64>,
    centers: Array2<f64>,
    center_source: CenterSource,
    labels: Vec<usize>,
    sample_colors: Vec<usize>,
    palette: DiscretePalette,
    grid: BoundaryGrid,
    view: ViewBounds,
    annotations: Vec<Annotation>,
    axis_labels: [String; 2],
    config: PlotConfig,
}

impl DecisionPlot {
    /// Samples in the 2D plane (N×2).
    pub fn reduced_samples(&self) -> &Array2<f64> {
        &self.reduced_samples
    }

    /// Centers in the 2D plane (K×2); row `k` is drawn as index `k`.
    pub fn reduced_centers(&self) -> &Array2<f64> {
        &self.reduced_centers
    }

    /// Centers in the (preprocessed) feature space.
    pub fn centers(&self) -> &Array2<f64> {
        &self.centers
    }

    /// Whether the centers came from the model or were computed.
    pub fn center_source(&self) -> CenterSource {
        self.center_source
    }

    /// Cluster labels of the samples, as given by the model.
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Palette index of every sample (rank of its label).
    pub fn sample_colors(&self) -> &[usize] {
        &self.sample_colors
    }

    /// One color per distinct label.
    pub fn palette(&self) -> &DiscretePalette {
        &self.palette
    }

    /// Nearest-center lattice drawn as the background.
    pub fn grid(&self) -> &BoundaryGrid {
        &self.grid
    }

    /// Visible extent; identical to the grid's span.
    pub fn view_bounds(&self) -> ViewBounds {
        self.view
    }

    /// Center index labels, one per reduced center.
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Axis captions reported by the reducer.
    pub fn axis_labels(&self) -> &[String; 2] {
        &self.axis_labels
    }

    /// Configuration the plot was built with.
    pub fn config(&self) -> &PlotConfig {
        &self.config
    }
}

/// Plot with [`PlotConfig::default`].
pub fn plot_decision_boundary(
    data: ArrayView2<'_, f64>,
    model: ModelRef<'_>,
    reducer: ReducerChoice<'_>,
) -> Result<DecisionPlot> {
    plot_decision_boundary_with(data, model, reducer, &PlotConfig::default())
}

/// Build a decision-boundary plot of `model` over `data`.
///
/// # Errors
///
/// - [`Error::EmptyInput`] if `data` has no rows or the model has no labels.
/// - [`Error::ShapeMismatch`] if the label count differs from the sample
///   count, or the model's centers live in a different feature space.
/// - [`Error::Pipeline`] for a pipeline that does not end in a model.
/// - [`Error::NonFinite`] if the (preprocessed) samples or the centers
///   contain NaN or infinite values.
/// - [`Error::Reduction`] from the reducer backend.
pub fn plot_decision_boundary_with(
    data: ArrayView2<'_, f64>,
    model: ModelRef<'_>,
    reducer: ReducerChoice<'_>,
    config: &PlotConfig,
) -> Result<DecisionPlot> {
    config.validate()?;
    if data.nrows() == 0 {
        return Err(Error::EmptyInput);
    }

    let stage = Stage::resolve(model)?;
    let km = stage.model();
    debug!(stage = stage.name(), "resolved model");

    let data_ = stage.preprocess(data)?;
    if data_.iter().any(|v| !v.is_finite()) {
        return Err(Error::NonFinite("samples"));
    }

    let labels = km.labels();
    if labels.is_empty() {
        return Err(Error::EmptyInput);
    }
    if labels.len() != data_.nrows() {
        return Err(Error::ShapeMismatch {
            expected: format!("{} labels", data_.nrows()),
            actual: format!("{} labels", labels.len()),
        });
    }

    let mut owned: Box<dyn Reducer>;
    let reducer: &mut dyn Reducer = match reducer {
        ReducerChoice::Kind(kind) => {
            owned = kind.build(2);
            &mut *owned
        }
        ReducerChoice::Instance(r) => r,
    };

    let x_reduced = reducer.fit_transform(data_.view())?;
    ensure_planar(&x_reduced, "reduced samples")?;

    let (centers, center_source) = match km.cluster_centers() {
        Some(c) => (c.to_owned(), CenterSource::Model),
        None => (compute_centers(labels, data_.view())?, CenterSource::Computed),
    };
    if centers.ncols() != data_.ncols() {
        return Err(Error::ShapeMismatch {
            expected: format!("centers with {} features", data_.ncols()),
            actual: format!("centers with {} features", centers.ncols()),
        });
    }
    if centers.iter().any(|v| !v.is_finite()) {
        return Err(Error::NonFinite("centers"));
    }

    let mu_reduced = reducer.transform(centers.view())?;
    ensure_planar(&mu_reduced, "reduced centers")?;

    let index = CenterIndex::new(mu_reduced.view())?;

    let distinct = distinct_labels(labels);
    let n_clusters = distinct.len();
    if n_clusters != mu_reduced.nrows() {
        warn!(
            n_clusters,
            n_centers = mu_reduced.nrows(),
            "center count differs from distinct label count"
        );
    }
    debug!(n_clusters, ?center_source, "centers ready");

    let palette = DiscretePalette::rediscretize(n_clusters, &SET1);
    let sample_colors: Vec<usize> = labels
        .iter()
        .map(|l| distinct.binary_search(l).unwrap_or(0))
        .collect();

    let view = ViewBounds::autoscale(&[mu_reduced.view(), x_reduced.view()], config.margin)?;
    let grid = BoundaryGrid::rasterize(&view, config.grid_resolution, &index)?;
    debug!(
        resolution = grid.resolution(),
        x = ?view.x,
        y = ?view.y,
        "rasterized decision grid"
    );

    let annotations = mu_reduced
        .outer_iter()
        .enumerate()
        .map(|(k, xy)| Annotation {
            text: k.to_string(),
            at: (xy[0], xy[1]),
        })
        .collect();

    Ok(DecisionPlot {
        reduced_samples: x_reduced,
        reduced_centers: mu_reduced,
        centers,
        center_source,
        labels: labels.to_vec(),
        sample_colors,
        palette,
        grid,
        view,
        annotations,
        axis_labels: reducer.axis_labels(),
        config: config.clone(),
    })
}

fn ensure_planar(points: &Array2<f64>, what: &str) -> Result<()> {
    if points.ncols() != 2 {
        return Err(Error::ShapeMismatch {
            expected: format!("{what} with 2 columns"),
            actual: format!("{what} with {} columns", points.ncols()),
        });
    }
    Ok(())
}
