//! Projection of samples and centers into the 2D plotting plane.
//!
//! A boundary plot is only meaningful if samples and centers share one
//! coordinate space. The [`Reducer`] is therefore fit exactly once, on the
//! samples, and centers go through [`Reducer::transform`] of that same fit.
//!
//! The reducer argument is a [`ReducerChoice`]: either a [`ReducerKind`] that
//! is built with two output components, or a caller-configured instance.

use crate::error::{Error, Result};
use linfa::traits::{Fit, Predict};
use linfa::DatasetBase;
use linfa_reduction::Pca;
use ndarray::{Array1, Array2, ArrayView2};

/// A fit-then-apply dimensionality reduction.
pub trait Reducer {
    /// Fit on `data` (replacing any previous fit) and project it.
    fn fit_transform(&mut self, data: ArrayView2<'_, f64>) -> Result<Array2<f64>>;

    /// Project `data` with the current fit.
    fn transform(&self, data: ArrayView2<'_, f64>) -> Result<Array2<f64>>;

    /// Axis captions for the first two output components.
    fn axis_labels(&self) -> [String; 2] {
        ["component 1".to_string(), "component 2".to_string()]
    }
}

/// Principal component projection backed by `linfa-reduction`.
#[derive(Debug)]
pub struct PcaReducer {
    n_components: usize,
    whiten: bool,
    fitted: Option<Pca<f64>>,
}

impl PcaReducer {
    pub fn new(n_components: usize) -> Self {
        Self {
            n_components,
            whiten: false,
            fitted: None,
        }
    }

    /// Scale components to unit variance.
    pub fn with_whiten(mut self, whiten: bool) -> Self {
        self.whiten = whiten;
        self
    }

    pub fn n_components(&self) -> usize {
        self.n_components
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// Fraction of variance carried by each component, once fit.
    pub fn explained_variance_ratio(&self) -> Option<Array1<f64>> {
        self.fitted.as_ref().map(|p| p.explained_variance_ratio())
    }
}

impl Reducer for PcaReducer {
    fn fit_transform(&mut self, data: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        if self.n_components == 0 {
            return Err(Error::InvalidParameter {
                name: "n_components",
                message: "must be at least 1",
            });
        }
        if data.ncols() < self.n_components {
            return Err(Error::DimensionMismatch {
                expected: self.n_components,
                found: data.ncols(),
            });
        }
        if data.iter().any(|v| !v.is_finite()) {
            return Err(Error::NonFinite("samples"));
        }

        let dataset = DatasetBase::from(data.to_owned());
        let pca = Pca::params(self.n_components)
            .whiten(self.whiten)
            .fit(&dataset)
            .map_err(|e| Error::Reduction(e.to_string()))?;

        self.fitted = Some(pca);
        self.transform(data)
    }

    fn transform(&self, data: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        let pca = self.fitted.as_ref().ok_or(Error::NotFitted)?;
        if data.iter().any(|v| !v.is_finite()) {
            return Err(Error::NonFinite("samples"));
        }
        let projected: Array2<f64> = pca.predict(&data);
        Ok(projected)
    }

    fn axis_labels(&self) -> [String; 2] {
        match self.explained_variance_ratio() {
            Some(ratio) if ratio.len() >= 2 => [
                format!("PC1 ({:.1}%)", ratio[0] * 100.0),
                format!("PC2 ({:.1}%)", ratio[1] * 100.0),
            ],
            _ => ["PC1".to_string(), "PC2".to_string()],
        }
    }
}

/// Reducers that can be constructed from a component count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReducerKind {
    #[default]
    Pca,
    /// PCA with unit-variance components.
    WhitenedPca,
}

impl ReducerKind {
    /// Build an unfitted reducer with `n_components` outputs.
    pub fn build(self, n_components: usize) -> Box<dyn Reducer> {
        match self {
            ReducerKind::Pca => Box::new(PcaReducer::new(n_components)),
            ReducerKind::WhitenedPca => Box::new(PcaReducer::new(n_components).with_whiten(true)),
        }
    }
}

/// Reducer argument of a boundary plot.
pub enum ReducerChoice<'r> {
    /// Construct internally with two components.
    Kind(ReducerKind),
    /// Use this instance as configured; it is refit on the plotted data.
    Instance(&'r mut dyn Reducer),
}

impl Default for ReducerChoice<'_> {
    fn default() -> Self {
        ReducerChoice::Kind(ReducerKind::default())
    }
}

impl From<ReducerKind> for ReducerChoice<'_> {
    fn from(kind: ReducerKind) -> Self {
        ReducerChoice::Kind(kind)
    }
}

impl<'r> From<&'r mut dyn Reducer> for ReducerChoice<'r> {
    fn from(r: &'r mut dyn Reducer) -> Self {
        ReducerChoice::Instance(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    fn line_with_noise() -> Array2<f64> {
        // Spread mostly along (1, 1, 0), a little along z.
        Array2::from_shape_fn((20, 3), |(i, j)| {
            let t = i as f64;
            match j {
                0 => t,
                1 => t + if i % 2 == 0 { 0.3 } else { -0.3 },
                _ => if i % 3 == 0 { 0.1 } else { -0.05 },
            }
        })
    }

    #[test]
    fn test_pca_outputs_two_columns() {
        let x = line_with_noise();
        let mut pca = PcaReducer::new(2);

        let y = pca.fit_transform(x.view()).unwrap();

        assert_eq!(y.dim(), (20, 2));
        assert!(pca.is_fitted());
        // first component carries nearly all the variance
        let ratio = pca.explained_variance_ratio().unwrap();
        assert!(ratio[0] > 0.95, "ratio = {ratio}");
        assert!(pca.axis_labels()[0].starts_with("PC1 ("));
    }

    #[test]
    fn test_transform_matches_fit_transform() {
        let x = line_with_noise();
        let mut pca = PcaReducer::new(2);

        let a = pca.fit_transform(x.view()).unwrap();
        let b = pca.transform(x.view()).unwrap();

        for (u, v) in a.iter().zip(b.iter()) {
            assert!((u - v).abs() < 1e-9);
        }
    }

    #[test]
    fn test_transform_before_fit() {
        let pca = PcaReducer::new(2);
        assert_eq!(pca.transform(array![[1.0, 2.0]].view()).err(), Some(Error::NotFitted));
    }

    #[test]
    fn test_too_few_features() {
        let mut pca = PcaReducer::new(2);
        let result = pca.fit_transform(array![[1.0], [2.0], [3.0]].view());
        assert_eq!(result.err(), Some(Error::DimensionMismatch { expected: 2, found: 1 }));
    }

    #[test]
    fn test_non_finite_samples() {
        let mut x = line_with_noise();
        x[[1, 0]] = f64::NAN;
        let mut pca = PcaReducer::new(2);

        assert_eq!(pca.fit_transform(x.view()).err(), Some(Error::NonFinite("samples")));
        assert!(!pca.is_fitted());
    }

    #[test]
    fn test_kind_builds_unfitted_reducer() {
        let x = line_with_noise();
        let mut r = ReducerKind::WhitenedPca.build(2);

        assert!(r.transform(x.view()).is_err());
        let y = r.fit_transform(x.view()).unwrap();
        assert_eq!(y.ncols(), 2);
    }
}
