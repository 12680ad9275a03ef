//! Preprocessing pipelines ending in a clustering model.
//!
//! A [`Pipeline`] is an ordered list of named steps. Every step but the last
//! must be a fitted [`Transform`]; the last must be a [`ClusterModel`]. A plot
//! accepts either a bare model or a pipeline through [`ModelRef`], and resolves
//! it exactly once into a [`Stage`]:
//!
//! | Input | Stage | Data seen by the reducer |
//! |-------|-------|--------------------------|
//! | bare model | [`Stage::Bare`] | raw data |
//! | one-step pipeline | [`Stage::SingleStep`] | raw data |
//! | n-step pipeline | [`Stage::MultiStep`] | output of the n-1 prefix transforms |

use crate::cluster::{ClusterModel, Clustering};
use crate::error::{Error, Result};
use ndarray::{Array1, Array2, ArrayView2, Axis};

/// A fitted, stateless-at-call-time data transform.
pub trait Transform {
    /// Map `data` (rows are samples) into the step's output space.
    fn transform(&self, data: ArrayView2<'_, f64>) -> Result<Array2<f64>>;
}

/// Standardize columns to zero mean and unit variance.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl StandardScaler {
    /// Fit column means and population standard deviations.
    ///
    /// Constant columns keep a scale of 1 so they map to zero instead of NaN.
    pub fn fit(data: ArrayView2<'_, f64>) -> Result<Self> {
        let mean = data.mean_axis(Axis(0)).ok_or(Error::EmptyInput)?;
        let scale = data
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s > f64::EPSILON { s } else { 1.0 });
        Ok(Self { mean, scale })
    }

    pub fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    pub fn scale(&self) -> &Array1<f64> {
        &self.scale
    }
}

impl Transform for StandardScaler {
    fn transform(&self, data: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        if data.ncols() != self.mean.len() {
            return Err(Error::DimensionMismatch {
                expected: self.mean.len(),
                found: data.ncols(),
            });
        }
        Ok((&data - &self.mean) / &self.scale)
    }
}

/// Any `Fn(ArrayView2) -> Result<Array2>` is a transform.
impl<F> Transform for F
where
    F: Fn(ArrayView2<'_, f64>) -> Result<Array2<f64>>,
{
    fn transform(&self, data: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        self(data)
    }
}

/// One pipeline step.
pub enum Step {
    /// Preprocessing step.
    Transform(Box<dyn Transform>),
    /// Clustering step (valid only in last position).
    Cluster(Box<dyn ClusterModel>),
}

impl Step {
    fn kind(&self) -> &'static str {
        match self {
            Step::Transform(_) => "transform",
            Step::Cluster(_) => "cluster",
        }
    }
}

impl std::fmt::Debug for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Step::{}", self.kind())
    }
}

/// Ordered, named steps.
#[derive(Debug, Default)]
pub struct Pipeline {
    steps: Vec<(String, Step)>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a preprocessing step.
    pub fn with_transform(mut self, name: impl Into<String>, transform: impl Transform + 'static) -> Self {
        self.steps.push((name.into(), Step::Transform(Box::new(transform))));
        self
    }

    /// Append a clustering step.
    pub fn with_cluster(mut self, name: impl Into<String>, model: impl ClusterModel + 'static) -> Self {
        self.steps.push((name.into(), Step::Cluster(Box::new(model))));
        self
    }

    /// Apply `transforms` in order, fit `clustering` on the result, and
    /// assemble the fitted pipeline.
    pub fn fit_cluster<C>(
        data: ArrayView2<'_, f64>,
        transforms: Vec<(String, Box<dyn Transform>)>,
        name: impl Into<String>,
        clustering: &C,
    ) -> Result<Self>
    where
        C: Clustering,
        C::Model: 'static,
    {
        let mut current = data.to_owned();
        for (_, t) in &transforms {
            current = t.transform(current.view())?;
        }
        let model = clustering.fit(current.view())?;

        let mut steps: Vec<(String, Step)> = transforms
            .into_iter()
            .map(|(n, t)| (n, Step::Transform(t)))
            .collect();
        steps.push((name.into(), Step::Cluster(Box::new(model))));
        Ok(Self { steps })
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Steps in order with their names.
    pub fn steps(&self) -> impl Iterator<Item = (&str, &Step)> {
        self.steps.iter().map(|(n, s)| (n.as_str(), s))
    }

    /// Look up a step by name.
    pub fn named_step(&self, name: &str) -> Option<&Step> {
        self.steps.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }
}

/// Model argument of a boundary plot.
#[derive(Clone, Copy)]
pub enum ModelRef<'a> {
    Bare(&'a dyn ClusterModel),
    Pipeline(&'a Pipeline),
}

impl<'a> From<&'a Pipeline> for ModelRef<'a> {
    fn from(p: &'a Pipeline) -> Self {
        ModelRef::Pipeline(p)
    }
}

/// Pipeline shape, resolved once at the plot boundary.
pub enum Stage<'a> {
    /// A model passed directly; no preprocessing.
    Bare(&'a dyn ClusterModel),
    /// A pipeline with only its clustering step; no preprocessing.
    SingleStep(&'a dyn ClusterModel),
    /// Preprocessing prefix followed by the clustering step.
    MultiStep {
        prefix: Vec<(&'a str, &'a dyn Transform)>,
        last: &'a dyn ClusterModel,
    },
}

impl<'a> Stage<'a> {
    /// Resolve a model argument into its stage.
    ///
    /// # Errors
    ///
    /// [`Error::Pipeline`] if the pipeline is empty, its last step is not a
    /// clustering model, or a non-final step is not a transform.
    pub fn resolve(model: ModelRef<'a>) -> Result<Self> {
        let pipe = match model {
            ModelRef::Bare(m) => return Ok(Stage::Bare(m)),
            ModelRef::Pipeline(p) => p,
        };

        let ((last_name, last), prefix) = pipe
            .steps
            .split_last()
            .ok_or_else(|| Error::Pipeline("pipeline has no steps".into()))?;

        let last = match last {
            Step::Cluster(m) => &**m,
            Step::Transform(_) => {
                return Err(Error::Pipeline(format!(
                    "last step '{last_name}' is not a clustering model"
                )))
            }
        };

        if prefix.is_empty() {
            return Ok(Stage::SingleStep(last));
        }

        let prefix = prefix
            .iter()
            .map(|(name, step)| match step {
                Step::Transform(t) => Ok((name.as_str(), &**t)),
                Step::Cluster(_) => Err(Error::Pipeline(format!(
                    "step '{name}' has no transform"
                ))),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Stage::MultiStep { prefix, last })
    }

    /// The clustering model at the end of the stage.
    pub fn model(&self) -> &'a dyn ClusterModel {
        match self {
            Stage::Bare(m) | Stage::SingleStep(m) => *m,
            Stage::MultiStep { last, .. } => *last,
        }
    }

    /// Data as the clustering model saw it.
    pub fn preprocess(&self, data: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        match self {
            Stage::Bare(_) | Stage::SingleStep(_) => Ok(data.to_owned()),
            Stage::MultiStep { prefix, .. } => {
                let mut current = data.to_owned();
                for (_, t) in prefix {
                    current = t.transform(current.view())?;
                }
                Ok(current)
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Bare(_) => "bare",
            Stage::SingleStep(_) => "single-step",
            Stage::MultiStep { .. } => "multi-step",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{Kmeans, LabelAssignment};
    use ndarray::array;

    #[test]
    fn test_standard_scaler() {
        let x = array![[1.0, 5.0], [3.0, 5.0], [5.0, 5.0]];
        let scaler = StandardScaler::fit(x.view()).unwrap();

        let z = scaler.transform(x.view()).unwrap();

        assert!((z.column(0).sum()).abs() < 1e-12);
        let var = z.column(0).mapv(|v| v * v).sum() / 3.0;
        assert!((var - 1.0).abs() < 1e-12);
        // constant column maps to zero, not NaN
        assert!(z.column(1).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_scaler_dimension_mismatch() {
        let scaler = StandardScaler::fit(array![[1.0, 2.0], [3.0, 4.0]].view()).unwrap();
        let result = scaler.transform(array![[1.0, 2.0, 3.0]].view());
        assert_eq!(result.err(), Some(Error::DimensionMismatch { expected: 2, found: 3 }));
    }

    #[test]
    fn test_resolve_bare() {
        let m = LabelAssignment::new(vec![0, 1]);
        let stage = Stage::resolve(ModelRef::Bare(&m)).unwrap();
        assert_eq!(stage.name(), "bare");
        assert_eq!(stage.model().labels(), &[0, 1]);
    }

    #[test]
    fn test_resolve_single_step_skips_preprocessing() {
        let pipe = Pipeline::new().with_cluster("km", LabelAssignment::new(vec![0, 1]));
        let stage = Stage::resolve((&pipe).into()).unwrap();

        assert_eq!(stage.name(), "single-step");
        let x = array![[1.0, 2.0], [3.0, 4.0]];
        assert_eq!(stage.preprocess(x.view()).unwrap(), x);
    }

    #[test]
    fn test_resolve_multi_step_applies_prefix_in_order() {
        let add_one = |x: ArrayView2<'_, f64>| -> Result<Array2<f64>> { Ok(&x + 1.0) };
        let double = |x: ArrayView2<'_, f64>| -> Result<Array2<f64>> { Ok(&x * 2.0) };
        let pipe = Pipeline::new()
            .with_transform("add", add_one)
            .with_transform("double", double)
            .with_cluster("km", LabelAssignment::new(vec![0]));

        let stage = Stage::resolve((&pipe).into()).unwrap();

        assert_eq!(stage.name(), "multi-step");
        let out = stage.preprocess(array![[1.0, 2.0]].view()).unwrap();
        assert_eq!(out, array![[4.0, 6.0]]);
    }

    #[test]
    fn test_resolve_rejects_bad_shapes() {
        let empty = Pipeline::new();
        assert!(matches!(Stage::resolve((&empty).into()), Err(Error::Pipeline(_))));

        let no_model = Pipeline::new().with_transform("scale", StandardScaler::fit(array![[1.0]].view()).unwrap());
        assert!(matches!(Stage::resolve((&no_model).into()), Err(Error::Pipeline(_))));

        let model_in_prefix = Pipeline::new()
            .with_cluster("a", LabelAssignment::new(vec![0]))
            .with_cluster("b", LabelAssignment::new(vec![0]));
        assert!(matches!(Stage::resolve((&model_in_prefix).into()), Err(Error::Pipeline(_))));
    }

    #[test]
    fn test_fit_cluster_builds_named_steps() {
        let x = array![[0.0, 0.0], [0.2, 0.1], [9.0, 9.0], [9.1, 9.2]];
        let scaler = StandardScaler::fit(x.view()).unwrap();

        let pipe = Pipeline::fit_cluster(
            x.view(),
            vec![("scale".to_string(), Box::new(scaler) as Box<dyn Transform>)],
            "kmeans",
            &Kmeans::new(2).with_seed(3),
        )
        .unwrap();

        assert_eq!(pipe.len(), 2);
        assert_eq!(pipe.steps().map(|(n, _)| n).collect::<Vec<_>>(), vec!["scale", "kmeans"]);
        match pipe.named_step("kmeans") {
            Some(Step::Cluster(m)) => assert_eq!(m.n_clusters(), 2),
            other => panic!("unexpected step: {other:?}"),
        }
    }
}
