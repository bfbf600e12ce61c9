//! Interpolators turning a knot grid into a continuous surface.

mod bicubic;
mod bilinear;

pub use bicubic::Bicubic;
pub use bilinear::Bilinear;

use serde::{Deserialize, Serialize};

use crate::knots::KnotGrid;

/// Evaluation of a knot grid inside one of its cells.
pub trait Interpolator {
    /// Evaluates the surface at `(x, q2)` inside cell `(ix, iq2)`.
    ///
    /// `ix` and `iq2` must be lower cell indices as produced by
    /// [`KnotGrid::x_low`] and [`KnotGrid::q2_low`]; anything else is a
    /// caller bug and may panic.
    fn evaluate(&self, grid: &KnotGrid, x: f64, q2: f64, ix: usize, iq2: usize) -> f64;

    /// Locates the enclosing cell and evaluates there.
    #[inline]
    fn interpolate(&self, grid: &KnotGrid, x: f64, q2: f64) -> f64 {
        let ix = grid.x_low(x);
        let iq2 = grid.q2_low(q2);
        self.evaluate(grid, x, q2, ix, iq2)
    }
}

/// Closed set of interpolation schemes selectable per member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolatorKind {
    /// Linear in `(log x, log Q2)`.
    Bilinear,
    /// Cubic Hermite in `(x, Q2)` with finite-difference derivatives.
    #[default]
    Bicubic,
}

impl Interpolator for InterpolatorKind {
    #[inline]
    fn evaluate(&self, grid: &KnotGrid, x: f64, q2: f64, ix: usize, iq2: usize) -> f64 {
        match self {
            InterpolatorKind::Bilinear => Bilinear.evaluate(grid, x, q2, ix, iq2),
            InterpolatorKind::Bicubic => Bicubic.evaluate(grid, x, q2, ix, iq2),
        }
    }
}
