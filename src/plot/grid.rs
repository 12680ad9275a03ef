//! Nearest-center rasterization of the plotting plane.
//!
//! The decision surface of a center-based clustering is the Voronoi diagram
//! of its centers. Instead of constructing cells, the visible rectangle is
//! sampled on a regular lattice and every lattice point takes the index of its
//! nearest (reduced) center, found with a KD-tree.

use crate::error::{Error, Result};
use kiddo::float::distance::squared_euclidean;
use kiddo::float::kdtree::KdTree;
use ndarray::{Array1, Array2, ArrayView2};
use tracing::trace;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Visible x/y extent of a plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBounds {
    /// `(min, max)` along the first reduced axis.
    pub x: (f64, f64),
    /// `(min, max)` along the second reduced axis.
    pub y: (f64, f64),
}

impl ViewBounds {
    /// Tight bounds of all points in `layers` (N×2 each), widened by
    /// `margin` times the span on every side.
    ///
    /// A zero span is widened by 0.5 on each side so the view never
    /// collapses to a line.
    pub fn autoscale(layers: &[ArrayView2<'_, f64>], margin: f64) -> Result<Self> {
        let mut x = (f64::INFINITY, f64::NEG_INFINITY);
        let mut y = (f64::INFINITY, f64::NEG_INFINITY);

        for layer in layers {
            if layer.ncols() != 2 {
                return Err(Error::ShapeMismatch {
                    expected: "2 columns".to_string(),
                    actual: format!("{} columns", layer.ncols()),
                });
            }
            for row in layer.outer_iter() {
                x = (x.0.min(row[0]), x.1.max(row[0]));
                y = (y.0.min(row[1]), y.1.max(row[1]));
            }
        }

        if !(x.0.is_finite() && x.1.is_finite() && y.0.is_finite() && y.1.is_finite()) {
            return Err(Error::EmptyInput);
        }

        Ok(Self {
            x: pad(x, margin),
            y: pad(y, margin),
        })
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        (self.x.0..=self.x.1).contains(&px) && (self.y.0..=self.y.1).contains(&py)
    }
}

fn pad((lo, hi): (f64, f64), margin: f64) -> (f64, f64) {
    let span = hi - lo;
    if span <= 0.0 {
        (lo - 0.5, hi + 0.5)
    } else {
        (lo - margin * span, hi + margin * span)
    }
}

/// `n` evenly spaced values from `lo` to `hi`, both included exactly.
fn linspace(lo: f64, hi: f64, n: usize) -> Array1<f64> {
    let step = (hi - lo) / (n - 1) as f64;
    Array1::from_shape_fn(n, |i| if i + 1 == n { hi } else { lo + step * i as f64 })
}

const BUCKET: usize = 32;

/// Nearest-neighbor index over 2D cluster centers.
///
/// Centers go into a KD-tree unless too many of them share a coordinate for
/// the tree's buckets to split; those sets are scanned linearly instead.
pub struct CenterIndex {
    lookup: Lookup,
    len: usize,
}

enum Lookup {
    Tree(KdTree<f64, usize, 2, BUCKET, u32>),
    Scan(Array2<f64>),
}

impl CenterIndex {
    /// Index the rows of a K×2 center matrix; row `k` answers as `k`.
    pub fn new(centers: ArrayView2<'_, f64>) -> Result<Self> {
        if centers.nrows() == 0 {
            return Err(Error::EmptyInput);
        }
        if centers.ncols() != 2 {
            return Err(Error::ShapeMismatch {
                expected: "K x 2 centers".to_string(),
                actual: format!("{} x {} centers", centers.nrows(), centers.ncols()),
            });
        }
        if centers.iter().any(|v| !v.is_finite()) {
            return Err(Error::NonFinite("centers"));
        }

        let lookup = if max_shared_coordinate(&centers) >= BUCKET {
            trace!(n_centers = centers.nrows(), "center index falls back to linear scan");
            Lookup::Scan(centers.to_owned())
        } else {
            let mut tree: KdTree<f64, usize, 2, BUCKET, u32> = KdTree::with_capacity(centers.nrows());
            for (k, c) in centers.outer_iter().enumerate() {
                tree.add(&[c[0], c[1]], k);
            }
            Lookup::Tree(tree)
        };

        Ok(Self {
            lookup,
            len: centers.nrows(),
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Index of the center closest to `(x, y)`.
    pub fn nearest(&self, x: f64, y: f64) -> usize {
        match &self.lookup {
            Lookup::Tree(tree) => tree
                .nearest_n(&[x, y], 1, &squared_euclidean)
                .into_iter()
                .next()
                .map(|n| n.item)
                .unwrap_or(0),
            Lookup::Scan(centers) => {
                let mut best = 0;
                let mut best_dist = f64::INFINITY;
                for (k, c) in centers.outer_iter().enumerate() {
                    let dist = (c[0] - x).powi(2) + (c[1] - y).powi(2);
                    if dist < best_dist {
                        best_dist = dist;
                        best = k;
                    }
                }
                best
            }
        }
    }
}

/// Largest number of rows sharing one value on either axis.
fn max_shared_coordinate(centers: &ArrayView2<'_, f64>) -> usize {
    (0..2)
        .map(|axis| {
            let mut values: Vec<f64> = centers.column(axis).to_vec();
            values.sort_by(|a, b| a.total_cmp(b));
            values
                .chunk_by(|a, b| a == b)
                .map(|run| run.len())
                .max()
                .unwrap_or(0)
        })
        .max()
        .unwrap_or(0)
}

/// Nearest center of every lattice point, row-major over `ys` × `xs`.
#[cfg(any(test, not(feature = "parallel")))]
fn nearest_ids_sequential(xs: &Array1<f64>, ys: &Array1<f64>, index: &CenterIndex) -> Vec<usize> {
    ys.iter()
        .flat_map(|&y| xs.iter().map(move |&x| index.nearest(x, y)))
        .collect()
}

#[cfg(feature = "parallel")]
fn nearest_ids_parallel(xs: &Array1<f64>, ys: &Array1<f64>, index: &CenterIndex) -> Vec<usize> {
    let n = xs.len();
    (0..ys.len() * n)
        .into_par_iter()
        .map(|i| index.nearest(xs[i % n], ys[i / n]))
        .collect()
}

/// Regular lattice over a [`ViewBounds`] labelled by nearest center.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryGrid {
    xs: Array1<f64>,
    ys: Array1<f64>,
    /// `ids[[row, col]]` is the nearest center to `(xs[col], ys[row])`.
    ids: Array2<usize>,
}

impl BoundaryGrid {
    /// Sample `resolution × resolution` points spanning `bounds` exactly.
    pub fn rasterize(bounds: &ViewBounds, resolution: usize, index: &CenterIndex) -> Result<Self> {
        if resolution < 2 {
            return Err(Error::InvalidParameter {
                name: "grid_resolution",
                message: "must be at least 2",
            });
        }

        let xs = linspace(bounds.x.0, bounds.x.1, resolution);
        let ys = linspace(bounds.y.0, bounds.y.1, resolution);

        #[cfg(feature = "parallel")]
        let flat = nearest_ids_parallel(&xs, &ys, index);

        #[cfg(not(feature = "parallel"))]
        let flat = nearest_ids_sequential(&xs, &ys, index);

        let ids = Array2::from_shape_vec((resolution, resolution), flat)
            .map_err(|e| Error::Other(e.to_string()))?;

        Ok(Self { xs, ys, ids })
    }

    pub fn xs(&self) -> &Array1<f64> {
        &self.xs
    }

    pub fn ys(&self) -> &Array1<f64> {
        &self.ys
    }

    pub fn ids(&self) -> &Array2<usize> {
        &self.ids
    }

    /// Lattice resolution along each axis.
    pub fn resolution(&self) -> usize {
        self.xs.len()
    }

    /// The area covered by the lattice.
    pub fn bounds(&self) -> ViewBounds {
        let n = self.xs.len() - 1;
        ViewBounds {
            x: (self.xs[0], self.xs[n]),
            y: (self.ys[0], self.ys[n]),
        }
    }

    /// Cells as `(x0, y0, x1, y1, id)`, each centered on its lattice point.
    ///
    /// Edge cells are clipped to the lattice bounds so the mesh covers the
    /// view exactly.
    pub fn cells(&self) -> impl Iterator<Item = (f64, f64, f64, f64, usize)> + '_ {
        let edges = |v: &Array1<f64>, i: usize| {
            let lo = if i == 0 { v[0] } else { 0.5 * (v[i - 1] + v[i]) };
            let hi = if i + 1 == v.len() { v[i] } else { 0.5 * (v[i] + v[i + 1]) };
            (lo, hi)
        };
        self.ids.indexed_iter().map(move |((r, c), &id)| {
            let (x0, x1) = edges(&self.xs, c);
            let (y0, y1) = edges(&self.ys, r);
            (x0, y0, x1, y1, id)
        })
    }
}
