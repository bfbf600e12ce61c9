use super::Interpolator;
use crate::knots::KnotGrid;

/// Linear interpolation in `log x` along both bounding Q2 rows, then linear in `log Q2`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bilinear;

#[inline]
fn lerp(t: f64, lo: f64, hi: f64) -> f64 {
    (1.0 - t) * lo + t * hi
}

impl Interpolator for Bilinear {
    fn evaluate(&self, grid: &KnotGrid, x: f64, q2: f64, ix: usize, iq2: usize) -> f64 {
        let xs = grid.xs();
        let q2s = grid.q2s();

        let logx0 = xs[ix].ln();
        let tx = (x.ln() - logx0) / (xs[ix + 1].ln() - logx0);
        let f_ql = lerp(tx, grid.xf(ix, iq2), grid.xf(ix + 1, iq2));
        let f_qh = lerp(tx, grid.xf(ix, iq2 + 1), grid.xf(ix + 1, iq2 + 1));

        let logq0 = q2s[iq2].ln();
        let tq = (q2.ln() - logq0) / (q2s[iq2 + 1].ln() - logq0);
        lerp(tq, f_ql, f_qh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_in_logs_is_reproduced() {
        let grid = KnotGrid::from_fn(vec![0.01, 0.1, 1.0], vec![1.0, 100.0], |x, q2| {
            2.0 + x.ln() - 0.5 * q2.ln()
        })
        .unwrap();
        let (x, q2) = (0.03, 7.0);
        let expected = 2.0 + f64::ln(x) - 0.5 * f64::ln(q2);
        let value = Bilinear.interpolate(&grid, x, q2);
        assert!((value - expected).abs() < 1e-12, "{value} vs {expected}");
    }
}
