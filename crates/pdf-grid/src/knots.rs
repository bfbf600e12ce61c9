//! Per-flavor knot tabulation.

use pdf_core::errors::{ErrorInfo, PdfError};
use pdf_core::locate_lower;
use serde::{Deserialize, Serialize};

fn check_increasing(axis: &str, nodes: &[f64]) -> Result<(), PdfError> {
    if nodes.len() < 2 {
        return Err(PdfError::Contract(
            ErrorInfo::new("axis-too-short", format!("{axis} axis needs at least two knots"))
                .with_context("len", nodes.len()),
        ));
    }
    if let Some(pos) = nodes.windows(2).position(|pair| !(pair[0] < pair[1])) {
        return Err(PdfError::Contract(
            ErrorInfo::new(
                "axis-not-increasing",
                format!("{axis} knots must be strictly increasing"),
            )
            .with_context("index", pos + 1),
        ));
    }
    Ok(())
}

/// Immutable tabulation of `xf` on an `(x, Q2)` knot lattice for one flavor.
///
/// Values are stored Q2-row major so that the x-direction of a row is contiguous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawKnotGrid", into = "RawKnotGrid")]
pub struct KnotGrid {
    xs: Vec<f64>,
    q2s: Vec<f64>,
    rows: Vec<f64>,
}

/// Serialised form: values listed x-major with Q2 running fastest.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawKnotGrid {
    xs: Vec<f64>,
    q2s: Vec<f64>,
    values: Vec<f64>,
}

impl TryFrom<RawKnotGrid> for KnotGrid {
    type Error = PdfError;

    fn try_from(raw: RawKnotGrid) -> Result<Self, Self::Error> {
        KnotGrid::new(raw.xs, raw.q2s, &raw.values)
    }
}

impl From<KnotGrid> for RawKnotGrid {
    fn from(grid: KnotGrid) -> Self {
        let values = grid.values_x_major();
        RawKnotGrid {
            xs: grid.xs,
            q2s: grid.q2s,
            values,
        }
    }
}

impl KnotGrid {
    /// Builds a grid from x knots, Q2 knots and values listed x-major
    /// (`values[ix * q2s.len() + iq2]`), the order of the usual data blocks.
    ///
    /// x knots must be strictly increasing inside `(0, 1]`, Q2 knots strictly
    /// increasing and positive, and every value finite.
    pub fn new(xs: Vec<f64>, q2s: Vec<f64>, values: &[f64]) -> Result<Self, PdfError> {
        check_increasing("x", &xs)?;
        check_increasing("q2", &q2s)?;
        if xs[0] <= 0.0 || xs[xs.len() - 1] > 1.0 {
            return Err(PdfError::Contract(
                ErrorInfo::new("x-knots-domain", "x knots must lie inside (0, 1]")
                    .with_context("first", xs[0])
                    .with_context("last", xs[xs.len() - 1]),
            ));
        }
        if q2s[0] <= 0.0 {
            return Err(PdfError::Contract(
                ErrorInfo::new("q2-knots-domain", "Q2 knots must be strictly positive")
                    .with_context("first", q2s[0]),
            ));
        }
        let (nx, nq2) = (xs.len(), q2s.len());
        pdf_core::ensure_len("table-shape", "value table", values.len(), nx * nq2)?;
        if let Some(pos) = values.iter().position(|value| !value.is_finite()) {
            return Err(PdfError::Contract(
                ErrorInfo::new("table-not-finite", "value table contains a non-finite entry")
                    .with_context("ix", pos / nq2)
                    .with_context("iq2", pos % nq2),
            ));
        }
        let mut rows = vec![0.0; nx * nq2];
        for ix in 0..nx {
            for iq2 in 0..nq2 {
                rows[iq2 * nx + ix] = values[ix * nq2 + iq2];
            }
        }
        Ok(Self { xs, q2s, rows })
    }

    /// Builds a grid by sampling `f(x, q2)` on the given knots.
    pub fn from_fn<F>(xs: Vec<f64>, q2s: Vec<f64>, f: F) -> Result<Self, PdfError>
    where
        F: Fn(f64, f64) -> f64,
    {
        let mut values = Vec::with_capacity(xs.len() * q2s.len());
        for &x in &xs {
            for &q2 in &q2s {
                values.push(f(x, q2));
            }
        }
        Self::new(xs, q2s, &values)
    }

    /// x knots.
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// Q2 knots.
    pub fn q2s(&self) -> &[f64] {
        &self.q2s
    }

    /// Tabulated value at knot `(ix, iq2)`.
    #[inline]
    pub fn xf(&self, ix: usize, iq2: usize) -> f64 {
        self.rows[iq2 * self.xs.len() + ix]
    }

    /// All values along x at Q2 knot `iq2`.
    #[inline]
    pub fn row(&self, iq2: usize) -> &[f64] {
        let nx = self.xs.len();
        &self.rows[iq2 * nx..(iq2 + 1) * nx]
    }

    /// Lower cell index along x.
    #[inline]
    pub fn x_low(&self, x: f64) -> usize {
        locate_lower(&self.xs, x)
    }

    /// Lower cell index along Q2.
    #[inline]
    pub fn q2_low(&self, q2: f64) -> usize {
        locate_lower(&self.q2s, q2)
    }

    /// Smallest x knot.
    pub fn x_min(&self) -> f64 {
        self.xs[0]
    }

    /// Largest x knot.
    pub fn x_max(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }

    /// Smallest Q2 knot.
    pub fn q2_min(&self) -> f64 {
        self.q2s[0]
    }

    /// Largest Q2 knot.
    pub fn q2_max(&self) -> f64 {
        self.q2s[self.q2s.len() - 1]
    }

    fn values_x_major(&self) -> Vec<f64> {
        let (nx, nq2) = (self.xs.len(), self.q2s.len());
        let mut values = Vec::with_capacity(nx * nq2);
        for ix in 0..nx {
            for iq2 in 0..nq2 {
                values.push(self.xf(ix, iq2));
            }
        }
        values
    }
}
