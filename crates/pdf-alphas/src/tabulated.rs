use std::ops::Range;

use pdf_core::errors::{ensure_len, ErrorInfo, PdfError};
use pdf_core::hermite::{interpolate_cubic, node_slope};
use pdf_core::locate_lower;

use crate::params::QcdParams;

/// Cubic Hermite interpolation of tabulated `(Q2, alpha_s)` pairs in `ln Q2`.
///
/// A Q2 value listed twice closes one segment and opens the next, so that
/// a jump in slope (or value) at a flavor threshold is not smoothed over.
/// Each segment is interpolated on its own knots.
#[derive(Debug, Clone, PartialEq)]
pub struct TabulatedSolver {
    params: QcdParams,
    q2s: Vec<f64>,
    log_q2s: Vec<f64>,
    alphas: Vec<f64>,
    segments: Vec<Range<usize>>,
}

fn table_error(code: &str, message: &str) -> PdfError {
    PdfError::Contract(ErrorInfo::new(code, message))
}

fn split_segments(q2s: &[f64]) -> Result<Vec<Range<usize>>, PdfError> {
    let mut segments = Vec::new();
    let mut start = 0;
    for i in 1..q2s.len() {
        if q2s[i] < q2s[i - 1] {
            return Err(PdfError::Contract(
                ErrorInfo::new("alphas-table-order", "alpha_s knots must be non-decreasing in Q2")
                    .with_context("index", i),
            ));
        }
        if q2s[i] == q2s[i - 1] {
            segments.push(start..i);
            start = i;
        }
    }
    segments.push(start..q2s.len());
    if let Some(short) = segments.iter().find(|segment| segment.len() < 2) {
        return Err(PdfError::Contract(
            ErrorInfo::new("alphas-table-segment", "every alpha_s segment needs two distinct knots")
                .with_context("start", short.start),
        ));
    }
    Ok(segments)
}

impl TabulatedSolver {
    /// Builds a table from matching Q2 and alpha_s arrays.
    pub fn new(params: QcdParams, q2s: Vec<f64>, alphas: Vec<f64>) -> Result<Self, PdfError> {
        ensure_len("alphas-table-shape", "alpha_s values", alphas.len(), q2s.len())?;
        if q2s.len() < 2 {
            return Err(table_error("alphas-table-short", "an alpha_s table needs at least two knots"));
        }
        if q2s.iter().any(|q2| !(q2.is_finite() && *q2 > 0.0)) {
            return Err(table_error("alphas-table-domain", "alpha_s knots must be finite and positive in Q2"));
        }
        if alphas.iter().any(|alpha| !alpha.is_finite()) {
            return Err(table_error("alphas-table-not-finite", "alpha_s values must be finite"));
        }
        let segments = split_segments(&q2s)?;
        let log_q2s = q2s.iter().map(|q2| q2.ln()).collect();
        Ok(Self {
            params,
            q2s,
            log_q2s,
            alphas,
            segments,
        })
    }

    /// Current parameters.
    pub fn params(&self) -> &QcdParams {
        &self.params
    }

    pub(crate) fn params_mut(&mut self) -> &mut QcdParams {
        &mut self.params
    }

    /// Q2 knots.
    pub fn q2s(&self) -> &[f64] {
        &self.q2s
    }

    /// Tabulated alpha_s values.
    pub fn alphas(&self) -> &[f64] {
        &self.alphas
    }

    /// Number of independently interpolated segments.
    pub fn num_segments(&self) -> usize {
        self.segments.len()
    }

    /// Active flavors at `q2` from the quark-mass thresholds.
    pub fn num_flavors_q2(&self, q2: f64) -> u32 {
        self.params.num_flavors_q2(q2)
    }

    /// alpha_s at `q2`.
    pub fn alpha_s_q2(&self, q2: f64) -> Result<f64, PdfError> {
        if q2.is_nan() || q2 <= 0.0 {
            return Err(PdfError::Range(
                ErrorInfo::new("q2-non-positive", "alpha_s needs a positive Q2").with_context("q2", q2),
            ));
        }
        let first = self.q2s[0];
        let last = self.q2s.len() - 1;
        if q2 < first {
            return Ok(self.below_table(q2));
        }
        if q2 > self.q2s[last] {
            return Ok(self.alphas[last]);
        }
        // On a repeated knot the upper segment wins.
        let index = self.segments.partition_point(|segment| self.q2s[segment.start] <= q2);
        let segment = self.segments[index.max(1) - 1].clone();
        Ok(self.interpolate_segment(segment, q2.ln()))
    }

    fn below_table(&self, q2: f64) -> f64 {
        let slope = (self.alphas[1] / self.alphas[0]).ln() / (self.log_q2s[1] - self.log_q2s[0]);
        self.alphas[0] * (q2 / self.q2s[0]).powf(slope)
    }

    fn interpolate_segment(&self, segment: Range<usize>, log_q2: f64) -> f64 {
        let xs = &self.log_q2s[segment.clone()];
        let ys = &self.alphas[segment];
        let i = locate_lower(xs, log_q2);
        let width = xs[i + 1] - xs[i];
        let t = (log_q2 - xs[i]) / width;
        interpolate_cubic(
            t,
            ys[i],
            node_slope(xs, ys, i) * width,
            ys[i + 1],
            node_slope(xs, ys, i + 1) * width,
        )
    }
}
