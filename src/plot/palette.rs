//! Discrete color palettes.
//!
//! A boundary plot draws K clusters with exactly K colors. The colors are
//! taken from a qualitative base palette sampled at K evenly spaced
//! positions, the way a continuous colormap is "rediscretized": position
//! `t ∈ [0, 1]` picks base entry `min(⌊t·N⌋, N-1)`. With more clusters than
//! base entries, colors repeat.

use plotters::style::RGBColor;

/// ColorBrewer "Set1", nine qualitative colors.
pub const SET1: [RGBColor; 9] = [
    RGBColor(228, 26, 28),
    RGBColor(55, 126, 184),
    RGBColor(77, 175, 74),
    RGBColor(152, 78, 163),
    RGBColor(255, 127, 0),
    RGBColor(255, 255, 51),
    RGBColor(166, 86, 40),
    RGBColor(247, 129, 191),
    RGBColor(153, 153, 153),
];

/// Exactly `len()` colors, indexed by cluster position.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscretePalette {
    colors: Vec<RGBColor>,
}

impl DiscretePalette {
    /// Sample `n` colors evenly across `base`.
    pub fn rediscretize(n: usize, base: &[RGBColor]) -> Self {
        if base.is_empty() {
            return Self { colors: Vec::new() };
        }
        let last = base.len() - 1;
        let colors = (0..n)
            .map(|i| {
                let t = if n > 1 { i as f64 / (n - 1) as f64 } else { 0.0 };
                base[((t * base.len() as f64) as usize).min(last)]
            })
            .collect();
        Self { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color for cluster index `i`; indices past the end wrap around.
    pub fn color(&self, i: usize) -> RGBColor {
        self.colors[i % self.colors.len()]
    }

    pub fn colors(&self) -> &[RGBColor] {
        &self.colors
    }
}
